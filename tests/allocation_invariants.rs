use coldstart_core::allocation::{AllocationEngine, EngineConfig, RoundingMode};
use coldstart_core::interaction::{Interaction, InteractionType};
use coldstart_core::ranking::CategoryAggregate;
use coldstart_core::types::{percentage_of, total_count, AllocationError, CategoryAllocation};

// Small deterministic generator so failures are reproducible.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next() % n
    }
}

fn assert_slate_invariants(slate: &[CategoryAllocation], budget: usize) {
    assert_eq!(total_count(slate), budget, "slate must sum to budget exactly");
    for row in slate {
        assert!(
            (row.percentage - percentage_of(row.count, budget)).abs() < 1e-12,
            "percentage out of sync for {}",
            row.category_id
        );
    }
    assert!(slate.windows(2).all(|w| w[0].count >= w[1].count));
}

fn random_candidates(rng: &mut Lcg) -> Vec<CategoryAggregate> {
    let n = 1 + rng.below(12) as usize;
    (0..n)
        .map(|i| {
            // avg ranks in [1.0, 10.0] on a half-step grid
            let rank = 1.0 + rng.below(19) as f64 / 2.0;
            CategoryAggregate::new(format!("cat{i}").as_str(), rank)
        })
        .collect()
}

#[test]
fn cold_start_conserves_budget() {
    let mut rng = Lcg(7);
    for rounding in [RoundingMode::HalfAwayFromZero, RoundingMode::HalfEven] {
        let engine = AllocationEngine::with_config(EngineConfig::v0().with_rounding(rounding));
        for _ in 0..200 {
            let candidates = random_candidates(&mut rng);
            for budget in 1..=25 {
                let slate = engine
                    .cold_start_allocate_with_budget(&candidates, budget)
                    .unwrap();
                assert_eq!(slate.len(), candidates.len());
                assert_slate_invariants(&slate, budget);
            }
        }
    }
}

#[test]
fn warm_conserves_budget_or_fails_on_non_positive_weight() {
    let types = [
        InteractionType::Like,
        InteractionType::Dislike,
        InteractionType::Comment,
        InteractionType::NoLikeEitherDislike,
    ];
    let deltas = [1.0, -1.0, 2.0, -0.5];

    let mut rng = Lcg(42);
    let engine = AllocationEngine::default();

    for _ in 0..300 {
        let candidates = random_candidates(&mut rng);
        let base = engine.cold_start_allocate(&candidates).unwrap();

        let mut expected_total: f64 = base.iter().map(|r| r.count as f64).sum();
        let mut log = Vec::new();
        for _ in 0..rng.below(20) {
            // one extra index that is never a candidate
            let target = rng.below(candidates.len() as u64 + 1) as usize;
            let kind = rng.below(4) as usize;
            let category = if target < candidates.len() {
                expected_total += deltas[kind];
                format!("cat{target}")
            } else {
                "outsider".to_string()
            };
            log.push(Interaction::new("u", "v", category.as_str(), types[kind]));
        }

        match engine.warm_allocate(&base, &log) {
            Ok(slate) => {
                assert!(expected_total > 0.0);
                assert_eq!(slate.len(), base.len());
                assert_slate_invariants(&slate, 10);
            }
            Err(AllocationError::InvalidWeightState { total_weight }) => {
                assert!(expected_total <= 0.0);
                assert!((total_weight - expected_total).abs() < 1e-9);
            }
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }
}

#[test]
fn chained_warm_calls_keep_budget() {
    let engine = AllocationEngine::default();
    let mut slate = engine
        .cold_start_allocate(&[
            CategoryAggregate::new("a", 1.0),
            CategoryAggregate::new("b", 3.0),
            CategoryAggregate::new("c", 9.0),
        ])
        .unwrap();

    let mut log = Vec::new();
    for step in 0..30 {
        let category = ["a", "b", "c"][step % 3];
        let kind = if step % 4 == 0 {
            InteractionType::Dislike
        } else {
            InteractionType::Like
        };
        log.push(Interaction::new("u", "v", category, kind));

        slate = engine.warm_allocate(&slate, &log).unwrap();
        assert_slate_invariants(&slate, 10);
    }
}
