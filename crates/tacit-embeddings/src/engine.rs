//! EmbeddingEngine: the encoder used by the knowledge base.
//!
//! Coordinates the provider chain, token-budget truncation, and the
//! content-hash cache. Implements `IEmbeddingProvider`.

use tacit_core::config::EmbeddingConfig;
use tacit_core::errors::{EmbeddingError, TacitError, TacitResult};
use tacit_core::models::DegradationEvent;
use tacit_core::traits::IEmbeddingProvider;
use tacit_core::KnowledgeUnit;
use tracing::{debug, info};

use crate::cache::EmbeddingCache;
use crate::degradation::DegradationChain;
use crate::providers::{self, TfIdfEncoder};
use crate::text::{self, EncodedText};
use crate::tokens::TokenCounter;

/// A unit's vectors together with the text they were derived from.
#[derive(Debug, Clone)]
pub struct UnitEncoding {
    pub vector: Vec<f32>,
    /// Vector of the question fields alone.
    pub question: Vec<f32>,
    /// Encoder that produced both vectors.
    pub provider: String,
    pub text: EncodedText,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryEncoding {
    pub vector: Vec<f32>,
    pub provider: String,
}

fn cache_key(provider: &str, id: &str) -> String {
    format!("{provider}:{id}")
}

pub struct EmbeddingEngine {
    chain: DegradationChain,
    cache: EmbeddingCache,
    counter: TokenCounter,
    config: EmbeddingConfig,
}

impl EmbeddingEngine {
    /// Build the chain from configuration. The local TF-IDF encoder is
    /// appended behind a remote primary when `local_fallback` is set.
    pub fn new(config: EmbeddingConfig) -> TacitResult<Self> {
        let mut chain = DegradationChain::new();
        let primary = providers::create_provider(&config)?;
        let primary_is_local = primary.name() == "tfidf";
        chain.push(primary);
        if config.local_fallback && !primary_is_local {
            chain.push(Box::new(TfIdfEncoder::new(config.dimensions)));
        }
        Ok(Self::with_chain(config, chain))
    }

    /// Use a pre-built chain.
    pub fn with_chain(config: EmbeddingConfig, chain: DegradationChain) -> Self {
        let counter = TokenCounter::new();
        info!(
            provider = chain.active_provider_name(),
            providers = chain.len(),
            dims = config.dimensions,
            token_budget = config.token_budget,
            exact_tokens = counter.is_exact(),
            "EmbeddingEngine initialized"
        );
        Self {
            chain,
            cache: EmbeddingCache::new(config.l1_cache_size),
            counter,
            config,
        }
    }

    /// Text the encoder sees for `unit`, after budget truncation.
    pub fn encoding_text(&self, unit: &KnowledgeUnit) -> EncodedText {
        text::encoding_text(unit, &self.counter, self.config.token_budget)
    }

    fn check_dimensions(&self, vector: &[f32]) -> TacitResult<()> {
        if vector.len() != self.config.dimensions {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.config.dimensions,
                actual: vector.len(),
            }
            .into());
        }
        Ok(())
    }

    /// Embed `(cache id, text)` pairs with a single encoder.
    ///
    /// Cache entries are keyed by encoder name as well as id, so a vector
    /// from one encoder is never handed out for another.
    fn embed_keyed(&self, items: &[(String, String)]) -> TacitResult<(Vec<Vec<f32>>, String)> {
        let expected = self.chain.active_provider_name().to_string();
        let mut vectors: Vec<Option<Vec<f32>>> = items
            .iter()
            .map(|(id, _)| self.cache.get(&cache_key(&expected, id)))
            .collect();
        let missing: Vec<usize> = (0..items.len()).filter(|&i| vectors[i].is_none()).collect();
        if missing.is_empty() {
            return Ok((vectors.into_iter().flatten().collect(), expected));
        }

        let batch: Vec<String> = missing.iter().map(|&i| items[i].1.clone()).collect();
        let (embedded, used) = self.chain.embed_batch(&batch)?;
        let mut provider = used.to_string();
        if provider == expected {
            for (&i, vector) in missing.iter().zip(embedded) {
                vectors[i] = Some(vector);
            }
        } else {
            // Cached entries belong to `expected`; encode everything again.
            debug!(expected = %expected, used = %provider, "encoder changed, re-encoding batch");
            let all: Vec<String> = items.iter().map(|(_, text)| text.clone()).collect();
            let (embedded, used) = self.chain.embed_batch(&all)?;
            provider = used.to_string();
            vectors = embedded.into_iter().map(Some).collect();
        }

        let vectors: Vec<Vec<f32>> = vectors.into_iter().flatten().collect();
        if vectors.len() != items.len() {
            return Err(EmbeddingError::InferenceFailed {
                reason: "provider returned fewer vectors than requested".to_string(),
            }
            .into());
        }
        for ((id, _), vector) in items.iter().zip(&vectors) {
            self.check_dimensions(vector)?;
            self.cache.insert(cache_key(&provider, id), vector.clone());
        }
        Ok((vectors, provider))
    }

    fn unit_items(&self, unit: &KnowledgeUnit, text: &EncodedText) -> [(String, String); 2] {
        let question = text::question_text(unit, &self.counter, self.config.token_budget);
        [
            (format!("unit:{}", unit.content_hash), text.text.clone()),
            (format!("question:{}", unit.content_hash), question),
        ]
    }

    /// Encode one unit. Cached by the unit's content hash.
    pub fn encode_unit(&self, unit: &KnowledgeUnit) -> TacitResult<UnitEncoding> {
        let mut encoded = self.encode_units(std::slice::from_ref(unit))?;
        encoded.pop().ok_or_else(|| {
            TacitError::from(EmbeddingError::InferenceFailed {
                reason: "no encoding produced".to_string(),
            })
        })
    }

    /// Encode several units in one provider call where possible. Every
    /// returned vector comes from the same encoder.
    pub fn encode_units(&self, units: &[KnowledgeUnit]) -> TacitResult<Vec<UnitEncoding>> {
        let texts: Vec<EncodedText> = units.iter().map(|u| self.encoding_text(u)).collect();
        for (unit, text) in units.iter().zip(&texts) {
            if text.truncated() {
                debug!(unit = %unit.id, dropped = ?text.dropped, "encoding text truncated");
            }
        }
        let items: Vec<(String, String)> = units
            .iter()
            .zip(&texts)
            .flat_map(|(unit, text)| self.unit_items(unit, text))
            .collect();
        let (vectors, provider) = self.embed_keyed(&items)?;

        let mut vectors = vectors.into_iter();
        texts
            .into_iter()
            .map(|text| match (vectors.next(), vectors.next()) {
                (Some(vector), Some(question)) => Ok(UnitEncoding {
                    vector,
                    question,
                    provider: provider.clone(),
                    text,
                }),
                _ => Err(TacitError::from(EmbeddingError::InferenceFailed {
                    reason: "provider returned fewer vectors than requested".to_string(),
                })),
            })
            .collect()
    }

    /// Encode a query string, reporting which encoder answered.
    pub fn encode_query(&self, query: &str) -> TacitResult<QueryEncoding> {
        let id = format!("query:{}", blake3::hash(query.as_bytes()).to_hex());
        let (mut vectors, provider) = self.embed_keyed(&[(id, query.to_string())])?;
        let vector = vectors.pop().ok_or_else(|| EmbeddingError::InferenceFailed {
            reason: "no query vector produced".to_string(),
        })?;
        Ok(QueryEncoding { vector, provider })
    }

    pub fn is_available(&self) -> bool {
        self.chain.any_available()
    }

    pub fn drain_degradation_events(&self) -> Vec<DegradationEvent> {
        self.chain.drain_events()
    }

    pub fn active_provider(&self) -> &str {
        self.chain.active_provider_name()
    }

    pub fn dimensions(&self) -> usize {
        self.config.dimensions
    }

    pub fn token_budget(&self) -> usize {
        self.config.token_budget
    }
}

impl IEmbeddingProvider for EmbeddingEngine {
    fn embed(&self, text: &str) -> TacitResult<Vec<f32>> {
        let (vector, _) = self.chain.embed(text)?;
        self.check_dimensions(&vector)?;
        Ok(vector)
    }

    fn embed_batch(&self, texts: &[String]) -> TacitResult<Vec<Vec<f32>>> {
        let (vectors, _) = self.chain.embed_batch(texts)?;
        for v in &vectors {
            self.check_dimensions(v)?;
        }
        Ok(vectors)
    }

    fn dimensions(&self) -> usize {
        self.config.dimensions
    }

    fn name(&self) -> &str {
        "tacit-embedding-engine"
    }

    fn is_available(&self) -> bool {
        self.chain.any_available()
    }
}
