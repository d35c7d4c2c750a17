//! Recommendation generator: one recommendation per pillar, weakest first.
//!
//! Ordering: ascending pillar score; ties keep the canonical DREAM order
//! (Demand, Revenue, Engine, Admin, Marketing). The sort is stable, so the
//! output is identical for identical scores.

use serde::Serialize;

use crate::dream::scoring::ScoreBand;
use crate::models::assessment::{DreamScores, Pillar};

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PillarRanking {
    pub pillar: Pillar,
    pub score: f64,
    pub band: ScoreBand,
}

/// Pillars ordered weakest first, ties in DREAM order.
pub fn rank_pillars(scores: &DreamScores) -> Vec<PillarRanking> {
    let mut ranked: Vec<PillarRanking> = Pillar::ALL
        .iter()
        .map(|&pillar| {
            let score = scores.pillar(pillar);
            PillarRanking {
                pillar,
                score,
                band: ScoreBand::for_score(score),
            }
        })
        .collect();
    ranked.sort_by(|a, b| a.score.total_cmp(&b.score));
    ranked
}

pub fn generate_recommendations(scores: &DreamScores) -> Vec<String> {
    rank_pillars(scores)
        .into_iter()
        .map(|r| recommendation_for(r.pillar, r.band).to_string())
        .collect()
}

fn recommendation_for(pillar: Pillar, band: ScoreBand) -> &'static str {
    use Pillar::*;
    use ScoreBand::*;

    match (pillar, band) {
        (Demand, Critical) => "Demand: define your ideal customer profile and pick one lead channel to make predictable before adding more.",
        (Demand, Developing) => "Demand: document why customers choose you and track lead quality weekly so the pipeline stops depending on luck.",
        (Demand, Strong) => "Demand: your demand engine is healthy. Test one adjacent segment to widen the pipeline without diluting focus.",
        (Revenue, Critical) => "Revenue: revisit pricing and introduce a recurring or retained offer to stabilise monthly income.",
        (Revenue, Developing) => "Revenue: track conversion at each pipeline stage and build a deliberate upsell path for existing customers.",
        (Revenue, Strong) => "Revenue: protect margins as you grow by reviewing pricing and packaging at least quarterly.",
        (Engine, Critical) => "Engine: write down your core delivery process so work no longer depends on you being in the room.",
        (Engine, Developing) => "Engine: automate the repetitive steps of onboarding and reporting, then measure team capacity monthly.",
        (Engine, Strong) => "Engine: delivery is solid. Stress-test capacity for doubling volume before the next growth push.",
        (Admin, Critical) => "Admin: bring the books up to date and start a rolling 13-week cash-flow forecast.",
        (Admin, Developing) => "Admin: give every admin function an owner and a checklist, and review KPIs with leadership every month.",
        (Admin, Strong) => "Admin: keep the back office audit-ready so financing or due diligence never slows you down.",
        (Marketing, Critical) => "Marketing: tighten your brand message and commit to one channel you can measure end to end.",
        (Marketing, Developing) => "Marketing: write a simple marketing plan with a nurture sequence for leads who are not ready to buy.",
        (Marketing, Strong) => "Marketing: double down on the channels with the best acquisition cost and keep testing new messages.",
    }
}
