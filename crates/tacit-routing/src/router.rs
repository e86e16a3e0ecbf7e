//! Routing: choose specialists for a query and merge their output.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tacit_core::errors::{TacitError, TacitResult};
use tacit_core::models::{ScoredUnit, SearchOutcome};
use tacit_core::DomainConfig;
use tracing::debug;

use crate::merge::merge_matches;
use crate::policy::RoutingPolicy;
use crate::specialist::{Specialist, SpecialistOutput};

/// Which specialists were chosen, with the scores that chose them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Routing {
    /// Selected specialists, in invocation order.
    pub selections: Vec<(String, f64)>,
    /// Every specialist assessed, in declaration order.
    pub assessments: Vec<(String, f64)>,
    pub fallback_used: bool,
}

/// Merged specialist output for one query.
#[derive(Debug, Clone)]
pub struct Dispatch {
    pub matched: Vec<ScoredUnit>,
    pub specialists: Vec<String>,
    /// Best merged score, 0 when nothing matched.
    pub confidence: f64,
}

#[derive(Debug, Clone)]
pub struct Router {
    policy: RoutingPolicy,
    threshold: f64,
    specialists: Vec<Specialist>,
    fallback: Option<usize>,
}

impl Router {
    /// Resolve a domain's router and specialist descriptors.
    ///
    /// Without a named fallback the first declared specialist takes that role.
    pub fn from_config(config: &DomainConfig) -> TacitResult<Self> {
        let policy = RoutingPolicy::from_name(&config.router.policy)?;
        let specialists = config
            .specialists
            .iter()
            .map(Specialist::from_descriptor)
            .collect::<TacitResult<Vec<_>>>()?;
        let fallback = match &config.router.fallback_specialist {
            Some(name) => Some(
                specialists
                    .iter()
                    .position(|s| s.id() == name)
                    .ok_or_else(|| {
                        TacitError::validation(format!("fallback specialist {name} is not declared"))
                    })?,
            ),
            None if specialists.is_empty() => None,
            None => Some(0),
        };
        Ok(Self {
            policy,
            threshold: config.router.threshold,
            specialists,
            fallback,
        })
    }

    pub fn policy(&self) -> RoutingPolicy {
        self.policy
    }

    pub fn specialists(&self) -> &[Specialist] {
        &self.specialists
    }

    fn assess_all(&self, query: &str, search: &SearchOutcome) -> Vec<(String, f64)> {
        self.specialists
            .par_iter()
            .map(|s| (s.id().to_string(), s.can_handle(query, search)))
            .collect()
    }

    fn fallback_routing(&self, assessments: Vec<(String, f64)>) -> Routing {
        let selections = self
            .fallback
            .and_then(|i| {
                let id = self.specialists.get(i)?.id();
                let score = assessments.iter().find(|(p, _)| p == id).map_or(0.0, |(_, s)| *s);
                Some(vec![(id.to_string(), score)])
            })
            .unwrap_or_default();
        Routing {
            selections,
            assessments,
            fallback_used: true,
        }
    }

    /// Pick specialists for `query` under the domain's policy.
    ///
    /// When nothing reaches the threshold the fallback specialist is chosen,
    /// so a domain with specialists always routes somewhere.
    pub fn route(&self, query: &str, search: &SearchOutcome) -> Routing {
        if self.specialists.is_empty() {
            return Routing::default();
        }
        let routing = match self.policy {
            RoutingPolicy::ConfidenceBased => {
                let assessments = self.assess_all(query, search);
                let best = assessments
                    .iter()
                    .fold(None::<&(String, f64)>, |best, p| match best {
                        Some(b) if b.1 >= p.1 => Some(b),
                        _ => Some(p),
                    })
                    .filter(|(_, score)| *score >= self.threshold)
                    .cloned();
                match best {
                    Some(best) => Routing {
                        selections: vec![best],
                        assessments,
                        fallback_used: false,
                    },
                    None => self.fallback_routing(assessments),
                }
            }
            RoutingPolicy::MultiSpecialist => {
                let assessments = self.assess_all(query, search);
                let mut selections: Vec<(String, f64)> = assessments
                    .iter()
                    .filter(|(_, score)| *score >= self.threshold)
                    .cloned()
                    .collect();
                selections.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
                if selections.is_empty() {
                    self.fallback_routing(assessments)
                } else {
                    Routing {
                        selections,
                        assessments,
                        fallback_used: false,
                    }
                }
            }
            RoutingPolicy::Parallel => {
                let assessments = self.assess_all(query, search);
                Routing {
                    selections: assessments.clone(),
                    assessments,
                    fallback_used: false,
                }
            }
            RoutingPolicy::Sequential => {
                let mut assessments = Vec::new();
                let mut chosen = None;
                for s in &self.specialists {
                    let score = s.can_handle(query, search);
                    assessments.push((s.id().to_string(), score));
                    if score >= self.threshold {
                        chosen = Some((s.id().to_string(), score));
                        break;
                    }
                }
                match chosen {
                    Some(c) => Routing {
                        selections: vec![c],
                        assessments,
                        fallback_used: false,
                    },
                    None => self.fallback_routing(assessments),
                }
            }
        };
        debug!(
            policy = self.policy.as_str(),
            selected = routing.selections.len(),
            fallback = routing.fallback_used,
            "routed query"
        );
        routing
    }

    /// Run the selected specialists against the shared search and merge.
    ///
    /// All selected specialists finish before this returns.
    pub fn dispatch(&self, routing: &Routing, search: &SearchOutcome) -> Dispatch {
        let selected: Vec<&Specialist> = routing
            .selections
            .iter()
            .filter_map(|(id, _)| self.specialists.iter().find(|s| s.id() == id))
            .collect();
        let outputs: Vec<SpecialistOutput> = selected.par_iter().map(|s| s.process(search)).collect();
        let specialists = outputs.iter().map(|o| o.specialist.clone()).collect();
        let matched = merge_matches(outputs.into_iter().map(|o| o.matched));
        let confidence = matched.first().map(|m| m.score).unwrap_or(0.0);
        Dispatch {
            matched,
            specialists,
            confidence,
        }
    }
}
