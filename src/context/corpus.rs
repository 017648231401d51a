//! Static maintenance corpus with keyword-scored retrieval.
//!
//! MVP retrieval uses keyword matching over a fixed document set; production
//! would use embeddings against a managed index. Passage contents are written
//! as directly actionable instructions so the guidance agent can present them
//! as steps without further rewriting.

use std::sync::OnceLock;

use anyhow::Result;
use async_trait::async_trait;

use super::{DocumentStore, Passage};

/// Knowledge document with retrieval metadata.
#[derive(Debug, Clone)]
struct Document {
    source_id: &'static str,
    content: &'static str,
    keywords: &'static [&'static str],
}

/// Static corpus - built once on first query.
static CORPUS: OnceLock<Vec<Document>> = OnceLock::new();

fn corpus() -> &'static Vec<Document> {
    CORPUS.get_or_init(|| {
        vec![
            Document {
                source_id: "SOP-123",
                content: "Inspect the primary coolant line for leaks and verify coolant \
                          level against the sight gauge (SOP-123 Sec 4.1).",
                keywords: &["coolant", "overheating", "temperature", "leak", "cnc", "spindle"],
            },
            Document {
                source_id: "SOP-123",
                content: "Verify torque settings on spindle mounting bolts to 85 Nm \
                          (SOP-123 Sec 4.2).",
                keywords: &["torque", "mounting", "bolt", "fracture", "micro-fracture", "cnc", "vibration"],
            },
            Document {
                source_id: "MAINT-GUIDE-V2",
                content: "Escalate to Level-2 maintenance if vibration exceeds 5 mm/s for \
                          more than 10 minutes (MAINT-GUIDE-V2).",
                keywords: &["vibration", "escalate", "bearing", "mm/s", "chatter"],
            },
            Document {
                source_id: "MAINT-GUIDE-V2",
                content: "Check surface finish against the discoloration reference chart; \
                          heat tinting indicates dry machining or coolant starvation \
                          (MAINT-GUIDE-V2).",
                keywords: &["discoloration", "surface", "surface-discoloration", "heat", "finish", "overheating"],
            },
            Document {
                source_id: "PUMP-SOP-88",
                content: "Replace the mechanical seal kit if seal weepage exceeds one drop \
                          per minute; bleed the casing after reassembly (PUMP-SOP-88).",
                keywords: &["pump", "seal", "seal-weep", "leak", "casing", "weepage"],
            },
            Document {
                source_id: "HYD-411",
                content: "Check hydraulic supply lines and fittings for leaks or blockages \
                          whenever system pressure reads below 35 PSI (HYD-411).",
                keywords: &["pressure", "hydraulic", "leak", "press", "psi", "blockage"],
            },
            Document {
                source_id: "CONV-OPS-12",
                content: "Re-tension and re-track the conveyor belt; inspect rollers for \
                          scoring before returning the line to speed (CONV-OPS-12).",
                keywords: &["conveyor", "belt", "belt-fraying", "roller", "tracking", "tracking-drift"],
            },
            Document {
                source_id: "LUB-SCHED-3",
                content: "Confirm the automatic lubrication cycle completed within the last \
                          8 hours; manually grease bearing points if it has not (LUB-SCHED-3).",
                keywords: &["lubrication", "bearing", "grease", "noise", "wear", "tool-wear"],
            },
            Document {
                source_id: "RBT-CAL-7",
                content: "Run the robot joint backlash calibration routine and inspect dress \
                          pack cabling for abrasion (RBT-CAL-7).",
                keywords: &["robot", "joint", "backlash", "cable", "cable-abrasion", "calibration"],
            },
            Document {
                source_id: "QC-55",
                content: "Quarantine parts produced since the first out-of-spec reading and \
                          log a quality notification (QC-55).",
                keywords: &["quality", "defect", "quarantine", "out-of-spec", "scrap"],
            },
        ]
    })
}

/// Score a document against the query terms.
///
/// Keyword hits weigh double; content substring hits weigh single. Mirrors the
/// behaviour of the production index closely enough for ranking tests.
fn relevance_score(query_terms: &[&str], doc: &Document) -> usize {
    let content_lower = doc.content.to_lowercase();
    let mut score = 0;

    for term in query_terms {
        for keyword in doc.keywords {
            if keyword.contains(term) || term.contains(keyword) {
                score += 2;
            }
        }
        if content_lower.contains(term) {
            score += 1;
        }
    }

    score
}

/// Keyword-scored retrieval over the static maintenance corpus.
pub struct StaticMaintenanceCorpus;

#[async_trait]
impl DocumentStore for StaticMaintenanceCorpus {
    async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<Passage>> {
        let query_lower = query.to_lowercase();
        let query_terms: Vec<&str> = query_lower.split_whitespace().collect();

        let mut scored: Vec<(usize, &Document)> = corpus()
            .iter()
            .map(|doc| (relevance_score(&query_terms, doc), doc))
            .filter(|(score, _)| *score > 0)
            .collect();

        // Stable sort keeps corpus order for equal scores, so ranking is
        // reproducible within and across calls.
        scored.sort_by(|a, b| b.0.cmp(&a.0));

        Ok(scored
            .into_iter()
            .take(k)
            .map(|(_, doc)| Passage {
                content: doc.content.to_string(),
                source_id: doc.source_id.to_string(),
            })
            .collect())
    }

    fn store_name(&self) -> &'static str {
        "StaticCorpus"
    }
}
