use std::sync::Arc;

use async_trait::async_trait;
use catalog::{Catalog, CatalogError, SyllabusRepository};
use course_core::model::{Assignment, CourseInfo, Dimension, LevelNumber, Week, WeekId};
use course_core::session::{Advance, QuizSession};
use course_core::time::fixed_clock;
use services::{
    AppConfig, AppServices, DashboardError, DashboardService, DeckKind, LevelAttempt, StudyError,
};

async fn app() -> AppServices {
    let catalog = Catalog::bundled().expect("bundled catalog");
    AppServices::new(catalog, fixed_clock(), AppConfig::default())
        .await
        .expect("services")
}

/// Answer every question, getting the first `correct` of them right.
fn play(attempt: &mut LevelAttempt, correct: usize) {
    let session: &mut QuizSession = attempt.session_mut();
    let mut index = 0;
    loop {
        let question = session.current_question().expect("question on screen");
        let pick = if index < correct {
            question.correct_option().id.clone()
        } else {
            question
                .options()
                .iter()
                .find(|o| !o.is_correct)
                .expect("a wrong option")
                .id
                .clone()
        };
        session.answer(&pick).unwrap();
        index += 1;
        if let Advance::Finished(_) = session.advance().unwrap() {
            break;
        }
    }
}

#[tokio::test]
async fn tiered_quiz_unlocks_level_by_level() {
    let app = app().await;
    let quiz = app.tiered_quiz();

    let summaries = quiz.levels().unwrap();
    assert_eq!(summaries.len(), 3);
    assert!(summaries[0].unlocked && !summaries[1].unlocked && !summaries[2].unlocked);
    assert!(summaries[2].is_final);

    // 3 of 5 is 60%, below the 70% threshold.
    let mut attempt = quiz.start_level(LevelNumber::FIRST).unwrap();
    play(&mut attempt, 3);
    let result = quiz.finish(&attempt).unwrap();
    assert_eq!(result.percent(), 60);
    assert!(!result.passed);
    assert!(quiz.start_level(LevelNumber::new(2)).is_err());

    let mut attempt = quiz.start_level(LevelNumber::FIRST).unwrap();
    play(&mut attempt, 5);
    let result = quiz.finish(&attempt).unwrap();
    assert_eq!(result.unlocked_next, Some(LevelNumber::new(2)));

    // 3 of 4 is 75%.
    let mut attempt = quiz.start_level(LevelNumber::new(2)).unwrap();
    play(&mut attempt, 3);
    let result = quiz.finish(&attempt).unwrap();
    assert_eq!(result.percent(), 75);
    assert_eq!(result.unlocked_next, Some(LevelNumber::new(3)));

    let mut attempt = quiz.start_level(LevelNumber::new(3)).unwrap();
    play(&mut attempt, 0);
    let result = quiz.finish(&attempt).unwrap();
    assert!(result.is_final);
    assert!(result.passed);
    assert_eq!(result.unlocked_next, None);
    assert_eq!(quiz.unlocked().unwrap().len(), 3);
}

#[tokio::test]
async fn dashboard_tracks_the_fixed_date() {
    let app = app().await;
    let overview = app.dashboard().overview().await.unwrap();

    // 2026-02-10 is fourteen days into the semester.
    assert_eq!(overview.current_week.id, WeekId::new(3));
    let items: Vec<_> = overview.upcoming.iter().map(|d| d.item.as_str()).collect();
    assert_eq!(items, ["Quiz 1", "Project Part 1: Proposal", "Quiz 2"]);
    let total: u32 = overview.weight_by_category.iter().map(|c| c.weight).sum();
    assert_eq!(total, 100);

    assert!(matches!(
        app.dashboard().week_detail(WeekId::new(40)).await,
        Err(DashboardError::UnknownWeek(40))
    ));
}

#[tokio::test]
async fn flashcards_and_concepts_read_the_catalog() {
    let app = app().await;

    let mut player = app.flashcards().player(DeckKind::CoreDimensions).await.unwrap();
    assert_eq!(player.position(), (1, 10));
    player.flip();
    assert!(player.visible_face().starts_with("Westminster: "));
    player.previous();
    assert_eq!(player.position(), (10, 10));
    assert!(!player.is_flipped());

    let concepts = app.flashcards().deck(DeckKind::KeyConcepts).await.unwrap();
    assert_eq!(concepts.len(), 12);

    let groups = app.concepts().groups().await.unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups.iter().map(|g| g.dimensions.len()).sum::<usize>(), 10);

    let party = app.concepts().compare("party_system").await.unwrap();
    assert_eq!(party.westminster, "Two-party system");
    assert!(matches!(
        app.concepts().compare("monarchy").await,
        Err(StudyError::UnknownDimension { .. })
    ));
}

#[tokio::test]
async fn project_assistant_uses_approved_countries() {
    let app = app().await;
    let mut wizard = app.project_assistant().await.unwrap();
    assert_eq!(wizard.countries().len(), 15);
    assert!(wizard.select_country("Israel").is_ok());
}

struct EmptySyllabus;

#[async_trait]
impl SyllabusRepository for EmptySyllabus {
    async fn course_info(&self) -> Result<CourseInfo, CatalogError> {
        let catalog = Catalog::bundled()?;
        catalog.syllabus.course_info().await
    }

    async fn schedule(&self) -> Result<Vec<Week>, CatalogError> {
        Ok(Vec::new())
    }

    async fn week(&self, _id: WeekId) -> Result<Week, CatalogError> {
        Err(CatalogError::NotFound)
    }

    async fn assignments(&self) -> Result<Vec<Assignment>, CatalogError> {
        Ok(Vec::new())
    }

    async fn dimensions(&self) -> Result<Vec<Dimension>, CatalogError> {
        Ok(Vec::new())
    }

    async fn approved_countries(&self) -> Result<Vec<String>, CatalogError> {
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn empty_schedule_has_no_current_week() {
    let dashboard = DashboardService::new(fixed_clock(), Arc::new(EmptySyllabus));
    assert!(matches!(
        dashboard.current_week().await,
        Err(DashboardError::EmptySchedule)
    ));
}
