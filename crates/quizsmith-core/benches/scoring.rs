use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quizsmith_core::attempt::{Answers, Response};
use quizsmith_core::model::{Question, QuestionType, Quiz};
use quizsmith_core::scoring::score_attempt;
use quizsmith_core::statistics::{record_attempt, QuizStats};
use quizsmith_core::{start_attempt, transition_quiz, QuizStatus};

fn make_quiz(n: usize) -> Quiz {
    let mut quiz = Quiz::new_draft("Bench", "bench", 60);
    for i in 0..n {
        let q = match i % 3 {
            0 => Question::choice(
                QuestionType::SingleChoice,
                "Pick one",
                ["a", "b", "c", "d"],
                &[i % 4],
                1,
            ),
            1 => Question::choice(
                QuestionType::MultiChoice,
                "Pick several",
                ["a", "b", "c", "d"],
                &[0, 2],
                2,
            ),
            _ => Question::text_answer(QuestionType::ShortAnswer, "Name it", ["alpha", "beta"], 1),
        };
        quiz.questions.push(q.with_id(format!("q{i}")));
    }
    quiz
}

fn make_answers(quiz: &Quiz) -> Answers {
    quiz.questions
        .iter()
        .enumerate()
        .map(|(i, q)| {
            let response = match q.question_type {
                QuestionType::SingleChoice => Response::choice(i % 4),
                QuestionType::MultiChoice => Response::Choices([0, 2].into_iter().collect()),
                _ => Response::text("  Beta "),
            };
            (q.id.clone(), response)
        })
        .collect()
}

fn bench_score_attempt(c: &mut Criterion) {
    let mut group = c.benchmark_group("score_attempt");

    for n in [10, 100, 1000] {
        let quiz = make_quiz(n);
        let answers = make_answers(&quiz);
        group.bench_function(format!("{n}_questions"), |b| {
            b.iter(|| score_attempt(black_box(&quiz), black_box(&answers)))
        });
    }

    group.finish();
}

fn bench_record_attempt(c: &mut Criterion) {
    let quiz = transition_quiz(&make_quiz(10), QuizStatus::Published, chrono::Utc::now())
        .expect("bench quiz publishes");
    let now = chrono::Utc::now();
    let attempt = start_attempt(&quiz, "bench", 0, now)
        .expect("quiz is open")
        .submit(&quiz, make_answers(&quiz), now)
        .expect("answers reference quiz questions");

    c.bench_function("record_attempt", |b| {
        let stats = QuizStats {
            attempts_count: 1000,
            average_percentage: 72.5,
            passed_count: 600,
        };
        b.iter(|| record_attempt(black_box(&stats), black_box(&attempt)))
    });
}

criterion_group!(benches, bench_score_attempt, bench_record_attempt);
criterion_main!(benches);
