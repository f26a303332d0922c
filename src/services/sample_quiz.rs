use uuid::Uuid;

use crate::db::models::{AnswerOption, Question};

/// Topic key of the shared sample quiz; paired with the `system` owner it is
/// covered by a unique index, so the quiz exists at most once.
pub(crate) const SAMPLE_TOPIC: &str = "JavaScript Basics - Sample Quiz";

/// Fixed question set for the sample quiz. Authored content, not generated.
pub(crate) fn sample_questions() -> Vec<Question> {
    SAMPLE_QUESTION_SET
        .iter()
        .map(|(text, options, correct_option_id)| Question {
            id: Uuid::new_v4().to_string(),
            text: (*text).to_string(),
            options: options
                .iter()
                .enumerate()
                .map(|(index, option)| AnswerOption {
                    id: index as i32 + 1,
                    text: (*option).to_string(),
                })
                .collect(),
            correct_option_id: *correct_option_id,
        })
        .collect()
}

type SampleQuestion = (&'static str, [&'static str; 4], i32);

const SAMPLE_QUESTION_SET: &[SampleQuestion] = &[
    (
        "What is the type of NaN in JavaScript?",
        ["String", "Number", "Undefined", "Object"],
        2,
    ),
    (
        "How do you create a promise in JavaScript?",
        ["new Promise()", "Promise.create()", "createPromise()", "Promise.new()"],
        1,
    ),
    (
        "Which method mutates the original array?",
        ["map()", "filter()", "push()", "concat()"],
        3,
    ),
    (
        "What does \"this\" keyword refer to in arrow functions?",
        ["The global object", "The parent scope", "The function itself", "undefined"],
        2,
    ),
    (
        "Which is the correct way to declare a constant in JavaScript?",
        ["constant x = 10;", "const x = 10;", "let x = 10;", "var x = 10;"],
        2,
    ),
    (
        "What is the output of: typeof []?",
        ["array", "object", "Array", "undefined"],
        2,
    ),
    (
        "Which method is used to parse a string to an integer?",
        ["Integer.parse()", "parseInt()", "toInteger()", "Number.parse()"],
        2,
    ),
    (
        "What does JSON stand for?",
        [
            "JavaScript Object Notation",
            "Java Source Object Notation",
            "JavaScript Online Notation",
            "Java Serialized Object Notation",
        ],
        1,
    ),
    (
        "Which operator is used for strict equality comparison?",
        ["==", "===", "=", "!="],
        2,
    ),
    (
        "What is the result of: 2 + \"2\"?",
        ["4", "22", "NaN", "Error"],
        2,
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_quiz_has_ten_questions() {
        assert_eq!(sample_questions().len(), 10);
    }

    #[test]
    fn sample_questions_are_internally_consistent() {
        for question in sample_questions() {
            assert!(!question.text.is_empty());
            assert_eq!(question.options.len(), 4);
            assert!(question
                .options
                .iter()
                .any(|option| option.id == question.correct_option_id));
        }
    }

    #[test]
    fn sample_question_ids_are_unique() {
        let questions = sample_questions();
        let mut ids: Vec<_> = questions.iter().map(|question| question.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), questions.len());
    }
}
