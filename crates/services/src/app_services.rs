use std::sync::Arc;

use catalog::Catalog;

use crate::dashboard::DashboardService;
use crate::error::AppServicesError;
use crate::live::{LiveConfig, LiveSessionService};
use crate::project::ProjectAssistant;
use crate::study::{ConceptExplorer, FlashcardService, TieredQuizService};
use crate::tutor::{TutorConfig, TutorConversation, TutorService, system_prompt};
use crate::Clock;

/// Runtime knobs, normally read from the environment.
#[derive(Clone, Debug, Default)]
pub struct AppConfig {
    pub tutor: Option<TutorConfig>,
    pub live: LiveConfig,
}

impl AppConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            tutor: TutorConfig::from_env(),
            live: LiveConfig::from_env(),
        }
    }
}

/// Assembles app-facing services over one catalog.
#[derive(Clone)]
pub struct AppServices {
    catalog: Catalog,
    dashboard: Arc<DashboardService>,
    concepts: Arc<ConceptExplorer>,
    flashcards: Arc<FlashcardService>,
    tiered_quiz: Arc<TieredQuizService>,
    live: Arc<LiveSessionService>,
    tutor: Arc<TutorService>,
}

impl AppServices {
    /// # Errors
    ///
    /// Returns `AppServicesError` if the catalog cannot be read or the tutor
    /// context cannot be built.
    pub async fn new(
        catalog: Catalog,
        clock: Clock,
        config: AppConfig,
    ) -> Result<Self, AppServicesError> {
        let syllabus = Arc::clone(&catalog.syllabus);
        let quizzes = Arc::clone(&catalog.quizzes);

        let levels = quizzes.levels().await?;
        let tiered_quiz = Arc::new(TieredQuizService::new(levels));

        let prompt = system_prompt(
            &syllabus.course_info().await?,
            &syllabus.dimensions().await?,
            &syllabus.assignments().await?,
            &syllabus.schedule().await?,
        )?;
        let tutor = Arc::new(TutorService::new(config.tutor, prompt));
        if !tutor.enabled() {
            tracing::info!("COURSE_AI_API_KEY not set; tutor and outlines are disabled");
        }

        Ok(Self {
            dashboard: Arc::new(DashboardService::new(clock, Arc::clone(&syllabus))),
            concepts: Arc::new(ConceptExplorer::new(Arc::clone(&syllabus))),
            flashcards: Arc::new(FlashcardService::new(
                Arc::clone(&syllabus),
                Arc::clone(&quizzes),
            )),
            live: Arc::new(LiveSessionService::new(Arc::clone(&quizzes), config.live)),
            tiered_quiz,
            tutor,
            catalog,
        })
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn dashboard(&self) -> Arc<DashboardService> {
        Arc::clone(&self.dashboard)
    }

    #[must_use]
    pub fn concepts(&self) -> Arc<ConceptExplorer> {
        Arc::clone(&self.concepts)
    }

    #[must_use]
    pub fn flashcards(&self) -> Arc<FlashcardService> {
        Arc::clone(&self.flashcards)
    }

    #[must_use]
    pub fn tiered_quiz(&self) -> Arc<TieredQuizService> {
        Arc::clone(&self.tiered_quiz)
    }

    #[must_use]
    pub fn live(&self) -> Arc<LiveSessionService> {
        Arc::clone(&self.live)
    }

    #[must_use]
    pub fn tutor(&self) -> Arc<TutorService> {
        Arc::clone(&self.tutor)
    }

    #[must_use]
    pub fn conversation(&self) -> TutorConversation {
        TutorConversation::new(self.tutor())
    }

    /// # Errors
    ///
    /// Returns `AppServicesError` if the country list cannot be read.
    pub async fn project_assistant(&self) -> Result<ProjectAssistant, AppServicesError> {
        let countries = self.catalog.syllabus.approved_countries().await?;
        Ok(ProjectAssistant::new(self.tutor(), countries))
    }
}
