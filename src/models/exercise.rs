/// Exercises offered by the logger. The JSON API also accepts free-text names.
pub const EXERCISES: &[&str] = &[
    "Flat Dumbbell Press",
    "Chest Press",
    "Incline Dumbbell Press",
    "Incline Machine Press",
    "High to Low Cable Fly",
    "Pec Fly",
    "Rope Tricep Pushdowns",
    "Overhead Tricep Extensions",
    "Dumbbell Shoulder Press",
    "Lateral Raises",
    "Barbell Bench Press",
    "Lat Pulldown",
    "Seated Cable Row",
    "Straight Arm Cable Pulldown",
    "Preacher Curls",
    "Incline Dumbbell Curls",
    "Rear Delt Flys",
    "Face Pulls",
    "Leg Press",
    "Bulgarian Split Squat",
    "Squat Machine",
    "Leg Curls",
    "Standing Calf Raises",
    "Roman Chair",
    "Hammer Curls",
    "Dumbbell Lateral Raises",
    "Shoulder Press",
    "Overhead Cable Triceps Extensions",
    "Pec Deck Rear Fly",
    "Abs",
];
