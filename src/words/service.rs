/*!
 * Word application service.
 *
 * Wraps a `WordRepository` and adds the checks the storage contract does not
 * express on its own: no duplicate lemma per language on create, and an
 * existing id on update.
 */

use log::{debug, info, warn};

use crate::database::WordRepository;
use crate::errors::WordError;
use crate::words::Word;

/// Application service over an injected repository
#[derive(Debug, Clone)]
pub struct WordService<R> {
    repository: R,
}

impl<R: WordRepository> WordService<R> {
    /// Create a service around the given repository
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Create a word unless its lemma already exists for the language
    ///
    /// The lookup is not atomic with the insert; concurrent creators are
    /// still stopped by the store's unique index.
    pub async fn create_word(&self, word: Word) -> Result<Word, WordError> {
        word.validate()?;

        if self
            .repository
            .get_by_lemma(&word.lemma, &word.language)
            .await?
            .is_some()
        {
            warn!(
                "Rejecting duplicate word '{}' for language '{}'",
                word.lemma, word.language
            );
            return Err(WordError::Conflict(format!(
                "Word '{}' already exists for language '{}'",
                word.lemma, word.language
            )));
        }

        let created = self.repository.create(word).await?;
        info!("Created word {}", created.id().unwrap_or("<unassigned>"));
        Ok(created)
    }

    pub async fn get_word_by_id(&self, id: &str) -> Result<Option<Word>, WordError> {
        self.repository.get_by_id(id).await
    }

    pub async fn get_word_by_lemma(
        &self,
        lemma: &str,
        language: &str,
    ) -> Result<Option<Word>, WordError> {
        self.repository.get_by_lemma(lemma, language).await
    }

    pub async fn get_all_words(&self) -> Result<Vec<Word>, WordError> {
        self.repository.get_all().await
    }

    /// Update an existing word, replacing all of its mutable fields
    pub async fn update_word(&self, word: Word) -> Result<Word, WordError> {
        let id = word
            .id()
            .ok_or_else(|| WordError::Validation("Word ID is required for update".to_string()))?
            .to_string();

        if self.repository.get_by_id(&id).await?.is_none() {
            debug!("Update target {} does not exist", id);
            return Err(WordError::NotFound(format!("Word with ID {} not found", id)));
        }

        let updated = self.repository.update(word).await?;
        info!("Updated word {}", id);
        Ok(updated)
    }

    pub async fn delete_word(&self, id: &str) -> Result<bool, WordError> {
        let deleted = self.repository.delete(id).await?;
        if deleted {
            info!("Deleted word {}", id);
        }
        Ok(deleted)
    }
}
