// src/models/quiz_question.rs

use serde::Serialize;
use utoipa::ToSchema;

/// One multiple-choice question; `correct` indexes into `options`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct QuizQuestion {
    pub id: i64,
    pub question: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub options: Vec<String>,
    pub correct: usize,
    pub explanation: String,
}

struct Entry {
    question: &'static str,
    description: Option<&'static str>,
    options: [&'static str; 4],
    correct: usize,
    explanation: &'static str,
}

const BANK: [Entry; 5] = [
    Entry {
        question: "Which region is Kunqu Opera traditionally from?",
        description: Some("Choose the main home of Kunqu"),
        options: ["Beijing", "Suzhou", "Hangzhou", "Ningbo"],
        correct: 1,
        explanation: "Kunqu is the traditional opera of the Suzhou area and is on the UNESCO list of \
                      intangible cultural heritage.",
    },
    Entry {
        question: "Which province does West Lake Longjing tea craftsmanship belong to?",
        description: None,
        options: ["Anhui", "Zhejiang", "Jiangsu", "Jiangxi"],
        correct: 1,
        explanation: "Longjing tea grows around West Lake in Hangzhou, Zhejiang. Its processing \
                      technique is a national heritage item.",
    },
    Entry {
        question: "In which language is Suzhou Pingtan performed?",
        description: None,
        options: ["Mandarin", "Cantonese", "Wu", "Hokkien"],
        correct: 2,
        explanation: "Pingtan storytelling is performed in the Wu dialect and is a major narrative \
                      art of the Yangtze River Delta.",
    },
    Entry {
        question: "Which of these is not a Yangtze River Delta heritage item?",
        description: None,
        options: [
            "Xuan paper making",
            "Huizhou wood carving",
            "Jingdezhen porcelain",
            "Peking opera",
        ],
        correct: 3,
        explanation: "Peking opera is a Beijing art form. Xuan paper, Huizhou wood carving and \
                      Jingdezhen porcelain are all important heritage items of the region.",
    },
    Entry {
        question: "What tools are used in Zhejiang paper cutting?",
        description: None,
        options: ["Brush and ink", "Scissors and paper", "Knife and woodblock", "Brush and paint"],
        correct: 1,
        explanation: "Zhejiang paper cutting is made by cutting shapes into paper with scissors.",
    },
];

/// The fixed question bank served to the quiz page, in display order.
pub fn question_bank() -> Vec<QuizQuestion> {
    BANK.iter()
        .zip(1..)
        .map(|(entry, id)| QuizQuestion {
            id,
            question: entry.question.to_string(),
            description: entry.description.map(str::to_string),
            options: entry.options.iter().map(|o| o.to_string()).collect(),
            correct: entry.correct,
            explanation: entry.explanation.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answers_point_at_an_option() {
        for q in question_bank() {
            assert!(q.correct < q.options.len(), "question {}", q.id);
        }
    }

    #[test]
    fn ids_are_sequential() {
        let ids: Vec<i64> = question_bank().iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn missing_description_is_omitted() {
        let bank = question_bank();
        let first = serde_json::to_value(&bank[0]).unwrap();
        let second = serde_json::to_value(&bank[1]).unwrap();
        assert_eq!(first["options"][first["correct"].as_u64().unwrap() as usize], "Suzhou");
        assert!(second.get("description").is_none());
    }
}
