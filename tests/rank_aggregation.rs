use coldstart_core::ranking::{
    CategoryAggregate, Observation, RankAggregator, VideoCategoryMap, CANDIDATE_RANK_THRESHOLD,
};

fn sample_categories() -> VideoCategoryMap {
    vec![
        ("v1", "music"),
        ("v2", "sports"),
        ("v3", "news"),
        ("v4", "music"),
    ]
    .into_iter()
    .collect()
}

fn sample_observations() -> Vec<Observation> {
    vec![
        Observation::new("v1", "eu", 100.0),
        Observation::new("v2", "eu", 200.0),
        Observation::new("v3", "eu", 75.0),
        Observation::new("v4", "eu", 50.0),
        Observation::new("v3", "us", 300.0),
        Observation::new("v1", "us", 10.0),
        // v5 has no category and must be dropped
        Observation::new("v5", "us", 1000.0),
    ]
}

#[test]
fn ranks_are_assigned_per_region_by_mean_watchtime() {
    let summary = RankAggregator.compute_ranks(&sample_observations(), &sample_categories());

    let rows: Vec<(&str, &str, usize)> = summary
        .ranks
        .iter()
        .map(|r| (r.region.as_str(), r.category_id.as_str(), r.rank))
        .collect();

    // eu: sports 200, music mean(100, 50) = 75, news 75 (music sorts first)
    // us: news 300, music 10
    assert_eq!(
        rows,
        vec![
            ("eu", "sports", 1),
            ("eu", "music", 2),
            ("eu", "news", 3),
            ("us", "news", 1),
            ("us", "music", 2),
        ]
    );

    let eu_music = &summary.ranks[1];
    assert!((eu_music.avg_watchtime - 75.0).abs() < 1e-9);
}

#[test]
fn average_rank_only_counts_regions_where_category_appears() {
    let (_, candidates) = RankAggregator
        .compute_ranks(&sample_observations(), &sample_categories())
        .into_parts();

    assert_eq!(
        candidates,
        vec![
            CategoryAggregate::new("music", 2.0),
            CategoryAggregate::new("news", 2.0),
            // absent from "us", so its single eu rank is the average
            CategoryAggregate::new("sports", 1.0),
        ]
    );
}

#[test]
fn equal_watchtime_ranks_by_category_id() {
    let categories: VideoCategoryMap = vec![("a1", "alpha"), ("b1", "beta"), ("g1", "gamma")]
        .into_iter()
        .collect();
    // observed in reverse category order
    let observations = vec![
        Observation::new("g1", "r", 10.0),
        Observation::new("b1", "r", 10.0),
        Observation::new("a1", "r", 10.0),
    ];

    let summary = RankAggregator.compute_ranks(&observations, &categories);
    let order: Vec<(&str, usize)> = summary
        .ranks
        .iter()
        .map(|r| (r.category_id.as_str(), r.rank))
        .collect();

    assert_eq!(order, vec![("alpha", 1), ("beta", 2), ("gamma", 3)]);
}

#[test]
fn tie_order_does_not_depend_on_observation_order() {
    let categories: VideoCategoryMap = vec![("a1", "alpha"), ("g1", "gamma")]
        .into_iter()
        .collect();
    let forward = vec![
        Observation::new("a1", "r", 10.0),
        Observation::new("g1", "r", 10.0),
    ];
    let reversed = vec![
        Observation::new("g1", "r", 10.0),
        Observation::new("a1", "r", 10.0),
    ];

    let a = RankAggregator.compute_ranks(&forward, &categories);
    let b = RankAggregator.compute_ranks(&reversed, &categories);

    assert_eq!(a.ranks, b.ranks);
    assert_eq!(a.ranks[0].category_id.as_str(), "alpha");
    assert_eq!(a.ranks[1].category_id.as_str(), "gamma");
}

#[test]
fn nan_watchtime_still_yields_dense_ranks() {
    let mut categories = VideoCategoryMap::new();
    let mut observations = Vec::new();
    for i in 0..40 {
        let video = format!("v{i:02}");
        categories.insert(video.as_str(), format!("c{i:02}").as_str());
        let watchtime = if i % 3 == 0 { f64::NAN } else { (i * 5) as f64 };
        observations.push(Observation::new(video.as_str(), "solo", watchtime));
    }

    let summary = RankAggregator.compute_ranks(&observations, &categories);

    let ranks: Vec<usize> = summary.ranks.iter().map(|r| r.rank).collect();
    assert_eq!(ranks, (1..=10).collect::<Vec<usize>>());
    assert_eq!(summary.candidates.len(), 10);
}

#[test]
fn categories_beyond_rank_threshold_are_not_candidates() {
    let mut categories = VideoCategoryMap::new();
    let mut observations = Vec::new();
    for i in 1..=12 {
        let video = format!("v{i:02}");
        let category = format!("c{i:02}");
        categories.insert(video.as_str(), category.as_str());
        observations.push(Observation::new(video.as_str(), "solo", (130 - i * 10) as f64));
    }

    let summary = RankAggregator.compute_ranks(&observations, &categories);

    assert_eq!(summary.candidates.len(), 10);
    assert!(summary
        .candidates
        .iter()
        .all(|c| c.avg_rank <= CANDIDATE_RANK_THRESHOLD));
    assert_eq!(summary.candidates.last().map(|c| c.category_id.as_str()), Some("c10"));

    // ranks of filtered categories are dropped too
    assert_eq!(summary.ranks.len(), 10);
    assert!(summary.ranks.iter().all(|r| r.rank <= 10));
}

#[test]
fn rank_eleven_survives_when_other_regions_pull_the_average_down() {
    let mut categories = VideoCategoryMap::new();
    let mut observations = Vec::new();
    for i in 1..=11 {
        let video = format!("v{i:02}");
        categories.insert(video.as_str(), format!("c{i:02}").as_str());
        observations.push(Observation::new(video.as_str(), "north", (200 - i) as f64));
    }
    // c11 is the only category watched in the south: rank 1 there
    observations.push(Observation::new("v11", "south", 5.0));

    let summary = RankAggregator.compute_ranks(&observations, &categories);

    let c11 = summary
        .candidates
        .iter()
        .find(|c| c.category_id.as_str() == "c11")
        .expect("c11 must survive with avg rank 6");
    assert!((c11.avg_rank - 6.0).abs() < 1e-9);
    assert_eq!(summary.candidates.len(), 11);
}

#[test]
fn empty_inputs_produce_empty_result() {
    let aggregator = RankAggregator;

    let summary = aggregator.compute_ranks(&[], &sample_categories());
    assert!(summary.ranks.is_empty());
    assert!(summary.candidates.is_empty());

    let summary = aggregator.compute_ranks(&sample_observations(), &VideoCategoryMap::new());
    assert!(summary.ranks.is_empty());
    assert!(summary.candidates.is_empty());
}

#[test]
fn unmatched_join_produces_empty_result() {
    let categories: VideoCategoryMap = vec![("other", "music")].into_iter().collect();
    let summary = RankAggregator.compute_ranks(&sample_observations(), &categories);

    assert!(summary.ranks.is_empty());
    assert!(summary.candidates.is_empty());
}
