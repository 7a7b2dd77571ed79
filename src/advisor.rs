//! Question answering over the effective knowledge.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ai::{build_system_instruction, AiError, AiProvider, SourceLink};
use crate::knowledge::{load_corpus, Corpus, CorpusSource, KnowledgeError};

/// Errors from advisor operations.
#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("Question is empty")]
    EmptyQuestion,
    #[error(transparent)]
    Knowledge(#[from] KnowledgeError),
    #[error(transparent)]
    Ai(#[from] AiError),
}

/// Answer to a question, with what it was based on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisorAnswer {
    /// Model answer.
    pub text: String,
    /// Web pages the model grounded its answer on.
    pub sources: Vec<SourceLink>,
    /// Date the regulation was evaluated at.
    pub reference_date: NaiveDate,
    /// Ids of the documents sent as local context.
    pub context_documents: Vec<String>,
}

/// Answers questions using the documents in force at a reference date.
#[derive(Clone)]
pub struct Advisor {
    provider: Arc<dyn AiProvider>,
}

impl Advisor {
    /// Create an advisor backed by `provider`.
    #[must_use]
    pub fn new(provider: Arc<dyn AiProvider>) -> Self {
        Self { provider }
    }

    /// Answer `question` against the documents of `corpus` in force on
    /// `reference_date`. The effective set is resolved on every call.
    ///
    /// # Errors
    ///
    /// Returns `AdvisorError::EmptyQuestion` for a blank question and
    /// `AdvisorError::Ai` if the model request fails.
    pub async fn ask(
        &self,
        question: &str,
        corpus: &Corpus,
        reference_date: NaiveDate,
    ) -> Result<AdvisorAnswer, AdvisorError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(AdvisorError::EmptyQuestion);
        }

        let effective = corpus.effective(reference_date);
        if effective.is_empty() {
            tracing::warn!(%reference_date, "No document in force, asking without local context");
        }
        let system = build_system_instruction(&effective);
        let context_documents = effective
            .documents()
            .iter()
            .map(|d| d.id.clone())
            .collect();

        let generated = self
            .provider
            .generate(&system, question)
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "Advisor request failed"))?;

        tracing::info!(
            %reference_date,
            context = effective.len(),
            sources = generated.sources.len(),
            "Answered question"
        );

        Ok(AdvisorAnswer {
            text: generated.text,
            sources: generated.sources,
            reference_date,
            context_documents,
        })
    }

    /// Load a fresh corpus from `source`, then answer as [`Advisor::ask`].
    ///
    /// A corpus that fails validation is never used, even partially.
    ///
    /// # Errors
    ///
    /// Returns `AdvisorError::Knowledge` if loading fails, otherwise as
    /// [`Advisor::ask`].
    pub async fn ask_from_source(
        &self,
        question: &str,
        source: &dyn CorpusSource,
        reference_date: NaiveDate,
    ) -> Result<AdvisorAnswer, AdvisorError> {
        let corpus = load_corpus(source).await?;
        self.ask(question, &corpus, reference_date).await
    }
}
