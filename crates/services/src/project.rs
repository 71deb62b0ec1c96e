use std::sync::Arc;

use crate::error::ProjectError;
use crate::tutor::TutorService;

/// Text shown when outline generation fails.
pub const OUTLINE_FALLBACK: &str = "Failed to generate outline. Please try again.";

/// Where the country project wizard is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectStep {
    SelectCountry,
    DefineFocus {
        country: String,
    },
    Outline {
        country: String,
        interest: String,
        outline: String,
    },
}

impl ProjectStep {
    #[must_use]
    pub fn number(&self) -> u8 {
        match self {
            ProjectStep::SelectCountry => 1,
            ProjectStep::DefineFocus { .. } => 2,
            ProjectStep::Outline { .. } => 3,
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            ProjectStep::SelectCountry => "select country",
            ProjectStep::DefineFocus { .. } => "define focus",
            ProjectStep::Outline { .. } => "outline",
        }
    }
}

/// Prompt asking for a five-part research outline.
#[must_use]
pub fn outline_prompt(country: &str, interest: &str) -> String {
    format!(
        "Create a detailed research project outline for a comparative politics paper on {country}.
The student is specifically interested in: \"{interest}\".

The outline must follow this structure:
1. Introduction (Puzzle/Question)
2. Historical Context
3. Analysis of Key Institutions (Focus on 2-3 relevant Lijphart variables)
4. Assessment of Democratic Quality
5. Conclusion

Keep it academic, structured, and helpful for an undergraduate student."
    )
}

/// Three-step wizard: pick an approved country, describe a focus, get an outline.
pub struct ProjectAssistant {
    tutor: Arc<TutorService>,
    countries: Vec<String>,
    step: ProjectStep,
}

impl ProjectAssistant {
    #[must_use]
    pub fn new(tutor: Arc<TutorService>, countries: Vec<String>) -> Self {
        Self {
            tutor,
            countries,
            step: ProjectStep::SelectCountry,
        }
    }

    #[must_use]
    pub fn countries(&self) -> &[String] {
        &self.countries
    }

    #[must_use]
    pub fn step(&self) -> &ProjectStep {
        &self.step
    }

    fn wrong_step(&self, operation: &'static str) -> ProjectError {
        ProjectError::WrongStep {
            operation,
            step: self.step.name(),
        }
    }

    /// Choose a country by name, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns `UnapprovedCountry` for a name not on the list, or `WrongStep`
    /// after the first step.
    pub fn select_country(&mut self, name: &str) -> Result<&ProjectStep, ProjectError> {
        if self.step != ProjectStep::SelectCountry {
            return Err(self.wrong_step("select_country"));
        }
        let country = self
            .countries
            .iter()
            .find(|c| c.eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| ProjectError::UnapprovedCountry(name.trim().to_owned()))?;
        self.step = ProjectStep::DefineFocus {
            country: country.clone(),
        };
        Ok(&self.step)
    }

    /// Return to country selection from the focus step.
    ///
    /// # Errors
    ///
    /// Returns `WrongStep` unless the focus step is showing.
    pub fn back(&mut self) -> Result<&ProjectStep, ProjectError> {
        if !matches!(self.step, ProjectStep::DefineFocus { .. }) {
            return Err(self.wrong_step("back"));
        }
        self.step = ProjectStep::SelectCountry;
        Ok(&self.step)
    }

    /// Ask the tutor for an outline. A failed request still completes the
    /// wizard, with `OUTLINE_FALLBACK` as the outline.
    ///
    /// # Errors
    ///
    /// Returns `BlankInterest` for empty input, or `WrongStep` outside the focus step.
    pub async fn generate_outline(&mut self, interest: &str) -> Result<&str, ProjectError> {
        let ProjectStep::DefineFocus { country } = &self.step else {
            return Err(self.wrong_step("generate_outline"));
        };
        let interest = interest.trim();
        if interest.is_empty() {
            return Err(ProjectError::BlankInterest);
        }
        let country = country.clone();

        let outline = match self.tutor.generate(&outline_prompt(&country, interest)).await {
            Ok(outline) => outline,
            Err(err) => {
                tracing::warn!(%err, %country, "outline generation failed");
                OUTLINE_FALLBACK.to_owned()
            }
        };
        tracing::info!(%country, "project outline ready");

        self.step = ProjectStep::Outline {
            country,
            interest: interest.to_owned(),
            outline,
        };
        match &self.step {
            ProjectStep::Outline { outline, .. } => Ok(outline.as_str()),
            _ => Err(self.wrong_step("generate_outline")),
        }
    }

    /// Start over from country selection.
    pub fn restart(&mut self) {
        self.step = ProjectStep::SelectCountry;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assistant() -> ProjectAssistant {
        ProjectAssistant::new(
            Arc::new(TutorService::new(None, String::new())),
            vec!["Germany".into(), "New Zealand".into()],
        )
    }

    #[test]
    fn only_approved_countries_advance() {
        let mut wizard = assistant();
        assert!(matches!(
            wizard.select_country("Narnia"),
            Err(ProjectError::UnapprovedCountry(name)) if name == "Narnia"
        ));
        assert_eq!(wizard.step().number(), 1);

        let step = wizard.select_country("new zealand").unwrap();
        assert_eq!(
            step,
            &ProjectStep::DefineFocus {
                country: "New Zealand".into()
            }
        );
        assert!(wizard.select_country("Germany").is_err());
        wizard.back().unwrap();
        assert_eq!(wizard.step(), &ProjectStep::SelectCountry);
    }

    #[tokio::test]
    async fn failed_generation_yields_retry_text() {
        let mut wizard = assistant();
        assert!(wizard.generate_outline("electoral reform").await.is_err());

        wizard.select_country("Germany").unwrap();
        assert!(matches!(
            wizard.generate_outline("  ").await,
            Err(ProjectError::BlankInterest)
        ));

        let outline = wizard.generate_outline("federalism").await.unwrap();
        assert_eq!(outline, OUTLINE_FALLBACK);
        assert_eq!(wizard.step().number(), 3);

        wizard.restart();
        assert_eq!(wizard.step(), &ProjectStep::SelectCountry);
    }

    #[test]
    fn prompt_names_country_and_structure() {
        let prompt = outline_prompt("Belgium", "consociationalism");
        assert!(prompt.contains("paper on Belgium"));
        assert!(prompt.contains("\"consociationalism\""));
        assert!(prompt.contains("4. Assessment of Democratic Quality"));
    }
}
