//! Domain-expert matchers.

use std::collections::BTreeSet;

use tacit_core::config::SpecialistDescriptor;
use tacit_core::errors::TacitResult;
use tacit_core::models::{ScoredUnit, SearchOutcome};
use tacit_core::KnowledgeUnit;
use tacit_retrieval::lexical;

use crate::policy::SpecialistKind;

/// What a specialist contributes once selected.
#[derive(Debug, Clone)]
pub struct SpecialistOutput {
    pub specialist: String,
    pub matched: Vec<ScoredUnit>,
    /// Best score among `matched`, 0 when empty.
    pub raw_confidence: f64,
}

#[derive(Debug, Clone)]
pub struct Specialist {
    id: String,
    kind: SpecialistKind,
    vocabulary: BTreeSet<String>,
    categories: BTreeSet<String>,
    threshold: f64,
}

impl Specialist {
    pub fn from_descriptor(descriptor: &SpecialistDescriptor) -> TacitResult<Self> {
        let vocabulary = descriptor
            .vocabulary
            .iter()
            .flat_map(|term| lexical::content_tokens(term))
            .collect();
        Ok(Self {
            id: descriptor.id.clone(),
            kind: SpecialistKind::from_name(&descriptor.kind)?,
            vocabulary,
            categories: descriptor.categories.clone(),
            threshold: descriptor.threshold,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> SpecialistKind {
        self.kind
    }

    fn covers(&self, unit: &KnowledgeUnit) -> bool {
        self.categories.is_empty() || unit.tags.iter().any(|t| self.categories.contains(t))
    }

    fn in_category<'a>(&'a self, search: &'a SearchOutcome) -> impl Iterator<Item = &'a ScoredUnit> {
        search
            .hits
            .iter()
            .filter(move |h| self.covers(&h.unit) && h.score >= self.threshold)
    }

    /// Share of the query's content tokens found in the vocabulary.
    pub fn vocabulary_score(&self, query: &str) -> f64 {
        lexical::overlap(&lexical::content_tokens(query), &self.vocabulary)
    }

    /// Best search score among units this specialist covers.
    pub fn knowledge_score(&self, search: &SearchOutcome) -> f64 {
        self.in_category(search)
            .map(|h| h.score)
            .fold(0.0, f64::max)
    }

    /// How well this specialist fits the query, in [0,1].
    ///
    /// Reads the shared search outcome; never searches on its own.
    pub fn can_handle(&self, query: &str, search: &SearchOutcome) -> f64 {
        let score = match self.kind {
            SpecialistKind::Keyword => self.vocabulary_score(query),
            SpecialistKind::Knowledge => self.knowledge_score(search),
            SpecialistKind::Hybrid => self
                .vocabulary_score(query)
                .max(self.knowledge_score(search)),
        };
        score.clamp(0.0, 1.0)
    }

    /// In-category matches from the shared search.
    pub fn process(&self, search: &SearchOutcome) -> SpecialistOutput {
        let matched: Vec<ScoredUnit> = self.in_category(search).cloned().collect();
        let raw_confidence = matched.first().map(|m| m.score).unwrap_or(0.0);
        SpecialistOutput {
            specialist: self.id.clone(),
            matched,
            raw_confidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(kind: &str) -> SpecialistDescriptor {
        SpecialistDescriptor {
            id: "plumber".into(),
            kind: kind.into(),
            vocabulary: ["faucet".to_string(), "drain pipe".to_string()].into(),
            categories: ["plumbing".to_string()].into(),
            threshold: 0.0,
        }
    }

    fn outcome() -> SearchOutcome {
        let mut faucet = KnowledgeUnit::new_candidate("f", "diy", "Faucet", "", "washer");
        faucet.tags.insert("plumbing".into());
        let shelf = KnowledgeUnit::new_candidate("s", "diy", "Shelf", "", "brackets");
        SearchOutcome {
            hits: vec![
                ScoredUnit { unit: shelf, score: 0.9, semantic: Some(0.9), lexical: 0.0 },
                ScoredUnit { unit: faucet, score: 0.4, semantic: Some(0.4), lexical: 0.0 },
            ],
            searched: true,
            ..Default::default()
        }
    }

    #[test]
    fn multi_word_vocabulary_is_tokenized() {
        let s = Specialist::from_descriptor(&descriptor("keyword")).unwrap();
        assert_eq!(s.vocabulary_score("the pipe is leaking"), 0.5);
    }

    #[test]
    fn knowledge_score_respects_categories() {
        let s = Specialist::from_descriptor(&descriptor("knowledge")).unwrap();
        assert_eq!(s.can_handle("anything", &outcome()), 0.4);
        let out = s.process(&outcome());
        assert_eq!(out.matched.len(), 1);
        assert_eq!(out.raw_confidence, 0.4);
    }

    #[test]
    fn hybrid_takes_the_larger_signal() {
        let s = Specialist::from_descriptor(&descriptor("hybrid")).unwrap();
        assert_eq!(s.can_handle("faucet", &outcome()), 1.0);
        assert_eq!(s.can_handle("hello", &outcome()), 0.4);
    }
}
