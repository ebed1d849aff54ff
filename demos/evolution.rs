use sociogram::{
    analytics::CentralityKind, engine::GraphSnapshotEngine, error::SnapshotError,
    sequence::EdgeSequence,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// How many nodes to list per measure at each step.
const TOP: usize = 3;

fn main() {
    // `RUST_LOG=sociogram=debug` shows each snapshot being assembled.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sociogram=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let engine = GraphSnapshotEngine::new(EdgeSequence::social_network());

    println!(
        "Replaying {} interactions between {} people...",
        engine.max_step(),
        engine.sequence().nodes(engine.max_step()).len()
    );

    for step in 1..=engine.max_step() {
        let snapshot = match engine.snapshot(step) {
            Ok(snapshot) => snapshot,
            Err(SnapshotError::Centrality(err)) => {
                println!("\nStep {step}: skipped, {err}");
                continue;
            }
            Err(err) => panic!("step {step} failed: {err}"),
        };

        println!(
            "\nStep {step}: {} nodes, {} edges, {} communities (modularity {:.2})",
            snapshot.nodes().len(),
            snapshot.edges().len(),
            snapshot.community_count(),
            snapshot.modularity()
        );

        for (kind, ranking) in snapshot.rankings(TOP) {
            let ranking: Vec<String> = ranking
                .iter()
                .map(|(id, score)| format!("{id} ({score:.2})"))
                .collect();

            println!("  top {kind}: {}", ranking.join(", "));
        }
    }

    // The full table once every interaction has happened.
    let last = engine
        .snapshot(engine.max_step())
        .expect("the complete network is connected");

    println!("\nFinal network:");
    for node in last.nodes() {
        println!("  {node}");
    }

    println!("\nCommunities:");
    for (community, members) in last.communities() {
        println!("  {community}: {}", members.join(", "));
    }

    let most_central = last.top(CentralityKind::Eigenvector, 1);
    if let Some((id, score)) = most_central.first() {
        println!("\nMost influential: {id} ({score:.2})");
    }
}
