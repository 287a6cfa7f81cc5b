//! XOR with a fixed-topology dendrite network.
//!
//! Two output nodes vote for 0.0 and 1.0; the network must route the
//! mixed-input cases to the second node and the rest to the first.
//!
//! Run with: `cargo run --example xor`
//! Set `RUST_LOG=debug` to see culling and stagnation messages.

use symbios_dendrite::{
    BreedingConfig, BreedingPolicy, Evolution, EvolutionConfig, TrainingSet,
};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("Dendrite XOR Example");
    println!("====================\n");

    let training = match TrainingSet::from_pairs(vec![
        (0.0, vec![0.0, 0.0]),
        (1.0, vec![0.0, 1.0]),
        (1.0, vec![1.0, 0.0]),
        (0.0, vec![1.0, 1.0]),
    ]) {
        Ok(set) => set,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let config = EvolutionConfig {
        layers: vec![2, 6, 4, 2],
        generations: 60,
        population_size: 120,
        survivors: 8,
        seed: Some(42),
        breeding: BreedingConfig {
            policy: BreedingPolicy::WeightedPull,
            ..BreedingConfig::default()
        },
        ..EvolutionConfig::default()
    };

    println!("Layers: {:?}", config.layers);
    println!("Population: {}", config.population_size);
    println!("Generations: {}", config.generations);
    println!();

    let mut evolution = match Evolution::new(config, training.clone()) {
        Ok(evolution) => evolution,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let mut solved_at = None;
    let result = evolution.run_with(|report| {
        if report.generation % 10 == 0 {
            println!("{}", report);
        }
        if solved_at.is_none() && report.best_score as usize == report.training_size {
            solved_at = Some(report.generation);
        }
    });

    let mut champion = match result {
        Ok(champion) => champion,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    println!();
    println!("Evolution Complete!");
    println!("==================");
    println!("Matched: {}/{}", champion.score(), training.len());
    println!(
        "Live edges: {}/{}",
        champion.live_edge_count(),
        champion.edge_count()
    );
    if let Some(gen) = solved_at {
        println!("Solved at generation: {}", gen);
    }

    println!("\nChampion XOR outputs:");
    for datum in &training {
        champion.reset();
        champion.set_inputs(datum.inputs());
        champion.propagate();
        let consensus = champion.read_consensus();
        let status = if consensus.index as f64 == datum.expected() {
            "✓"
        } else {
            "✗"
        };
        println!(
            "  {} XOR {} -> node {} (confidence {:.3}, expected {}) {}",
            datum.inputs()[0] as i32,
            datum.inputs()[1] as i32,
            consensus.index,
            consensus.confidence,
            datum.expected() as i32,
            status
        );
    }
}
