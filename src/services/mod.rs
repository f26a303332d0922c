pub(crate) mod grading;
pub(crate) mod question_gen;
pub(crate) mod quiz_lifecycle;
pub(crate) mod sample_quiz;
