// src/catalog.rs

//! Fixed questionnaire content: the seven practice dimensions and the
//! leadership quiz with its answer key.

use serde::Serialize;

use crate::config::QUIZ_QUESTION_COUNT;

/// One organizational-practice dimension, scored from two survey items.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Dimension {
    pub key: &'static str,
    pub title: &'static str,
    /// Column names of the two items, in storage order.
    pub items: [&'static str; 2],
    pub statements: [&'static str; 2],
}

pub const DIMENSION_COUNT: usize = 7;

pub static DIMENSIONS: [Dimension; DIMENSION_COUNT] = [
    Dimension {
        key: "a",
        title: "A. Shared information and open communication",
        items: ["a1", "a2"],
        statements: [
            "People have easy access to the information they need to do their jobs effectively.",
            "Plans and decisions are communicated so that they are clearly understood.",
        ],
    },
    Dimension {
        key: "b",
        title: "B. Compelling vision: purpose and values",
        items: ["b1", "b2"],
        statements: [
            "In my organization, leadership is aligned around a shared vision and values.",
            "In my organization, people are passionate about a shared purpose and values.",
        ],
    },
    Dimension {
        key: "c",
        title: "C. Continuous learning",
        items: ["c1", "c2"],
        statements: [
            "In my organization, people are actively supported in developing new skills and competencies.",
            "My organization continually incorporates new learning into standard ways of doing business.",
        ],
    },
    Dimension {
        key: "d",
        title: "D. Relentless focus on customer results",
        items: ["d1", "d2"],
        statements: [
            "Everyone in my organization maintains the highest standards of quality and service.",
            "All work processes are designed to make it easier for customers to do business with us.",
        ],
    },
    Dimension {
        key: "e",
        title: "E. Energizing systems and structures",
        items: ["e1", "e2"],
        statements: [
            "Formal and informal systems, structures and practices are integrated and aligned with each other.",
            "In my organization, systems, structures and practices make it easy for people to get their jobs done.",
        ],
    },
    Dimension {
        key: "f",
        title: "F. Shared power and high involvement",
        items: ["f1", "f2"],
        statements: [
            "People have the opportunity to influence decisions that affect them.",
            "Teams are used as a vehicle for getting work done and influencing decisions.",
        ],
    },
    Dimension {
        key: "g",
        title: "G. Leadership",
        items: ["g1", "g2"],
        statements: [
            "Leaders believe that leading is about serving, not being served.",
            "Leaders remove obstacles so that people can focus on their work and their customers.",
        ],
    },
];

/// Agreement scale shared by every practice item.
pub const SCALE_LABELS: [(u8, &str); 7] = [
    (1, "Strongly disagree"),
    (2, "Disagree"),
    (3, "Slightly disagree"),
    (4, "Neutral"),
    (5, "Slightly agree"),
    (6, "Agree"),
    (7, "Strongly agree"),
];

#[derive(Debug, Clone, Copy, Serialize)]
pub struct QuizOption {
    pub key: &'static str,
    pub text: &'static str,
}

/// A leadership quiz question.
/// The correct option is never serialized.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct QuizQuestion {
    pub id: &'static str,
    pub prompt: &'static str,
    pub options: [QuizOption; 2],
    #[serde(skip)]
    pub correct: &'static str,
}

impl QuizQuestion {
    pub fn has_option(&self, key: &str) -> bool {
        self.options.iter().any(|option| option.key == key)
    }
}

pub static QUIZ_QUESTIONS: [QuizQuestion; QUIZ_QUESTION_COUNT] = [
    QuizQuestion {
        id: "q1",
        prompt: "1. Leading at a higher level means:",
        options: [
            QuizOption { key: "a", text: "a. Acting for your own benefit" },
            QuizOption { key: "b", text: "b. Acting for the benefit of others" },
        ],
        correct: "b",
    },
    QuizQuestion {
        id: "q2",
        prompt: "2. Leadership values:",
        options: [
            QuizOption { key: "a", text: "a. Ethics, Relationships, Success and Learning" },
            QuizOption { key: "b", text: "b. Ethics, Authority, Money and Standards" },
        ],
        correct: "a",
    },
    QuizQuestion {
        id: "q3",
        prompt: "3. The three outcomes of a high performing organization are:",
        options: [
            QuizOption {
                key: "a",
                text: "a. Provider of choice, employer of choice and investment of choice",
            },
            QuizOption {
                key: "b",
                text: "b. Provider of choice, employer of choice and researcher of choice",
            },
        ],
        correct: "a",
    },
    QuizQuestion {
        id: "q4",
        prompt: "4. The key to empowerment is:",
        options: [
            QuizOption { key: "a", text: "a. Having more power" },
            QuizOption { key: "b", text: "b. Letting that power out" },
        ],
        correct: "b",
    },
    QuizQuestion {
        id: "q5",
        prompt: "5. The four basic leadership styles of the Situational Leadership model are:",
        options: [
            QuizOption { key: "a", text: "a. Directing, Coaching, Supporting and Delegating" },
            QuizOption { key: "b", text: "b. Directing, Coaching, Supporting and Authority" },
        ],
        correct: "a",
    },
    QuizQuestion {
        id: "q6",
        prompt: "6. Supportive team behaviors are:",
        options: [
            QuizOption { key: "a", text: "a. Organizing, teaching, focusing and structuring" },
            QuizOption { key: "b", text: "b. Praising, involving, listening and encouraging" },
        ],
        correct: "b",
    },
];

/// Question id paired with its correct option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerKey {
    pub question_id: &'static str,
    pub correct: &'static str,
}

/// Answer key of the leadership quiz, in question order.
pub fn answer_key() -> Vec<AnswerKey> {
    QUIZ_QUESTIONS
        .iter()
        .map(|q| AnswerKey {
            question_id: q.id,
            correct: q.correct,
        })
        .collect()
}

/// Question presented at 1-based `position`.
pub fn quiz_question(position: usize) -> Option<&'static QuizQuestion> {
    position.checked_sub(1).and_then(|idx| QUIZ_QUESTIONS.get(idx))
}

pub fn question_prompt(question_id: &str) -> Option<&'static str> {
    QUIZ_QUESTIONS
        .iter()
        .find(|q| q.id == question_id)
        .map(|q| q.prompt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimensions_cover_all_fourteen_items() {
        let items: Vec<&str> = DIMENSIONS.iter().flat_map(|d| d.items).collect();
        assert_eq!(
            items,
            vec![
                "a1", "a2", "b1", "b2", "c1", "c2", "d1", "d2", "e1", "e2", "f1", "f2", "g1", "g2"
            ]
        );
    }

    #[test]
    fn answer_key_matches_quiz() {
        let key = answer_key();
        let pairs: Vec<(&str, &str)> = key.iter().map(|k| (k.question_id, k.correct)).collect();
        assert_eq!(
            pairs,
            vec![("q1", "b"), ("q2", "a"), ("q3", "a"), ("q4", "b"), ("q5", "a"), ("q6", "b")]
        );
    }

    #[test]
    fn public_question_hides_correct_option() {
        let json = serde_json::to_value(QUIZ_QUESTIONS[0]).unwrap();
        assert!(json.get("correct").is_none());
        assert_eq!(json["id"], "q1");
        assert_eq!(json["options"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn quiz_question_is_one_based() {
        assert!(quiz_question(0).is_none());
        assert_eq!(quiz_question(1).unwrap().id, "q1");
        assert_eq!(quiz_question(6).unwrap().id, "q6");
        assert!(quiz_question(7).is_none());
    }

    #[test]
    fn options_are_a_and_b() {
        for q in QUIZ_QUESTIONS.iter() {
            assert!(q.has_option("a"));
            assert!(q.has_option("b"));
            assert!(!q.has_option("c"));
            assert!(q.has_option(q.correct));
        }
    }
}
