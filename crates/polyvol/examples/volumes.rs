//! Volume of a few reference polytopes under every algorithm.
//!
//! Purpose
//! - Show the three algorithms side by side on inputs with known volumes and
//!   print one JSON report per run, the format drivers persist.
//! - Demonstrate the logging setup: the library only emits `tracing` events,
//!   the binary installs the subscriber.
//!
//! Run with `cargo run --example volumes -p polyvol`.

use polyvol::prelude::*;
use tracing_subscriber::fmt::SubscriberBuilder;

fn main() {
    SubscriberBuilder::default().with_target(false).init();

    let cfg = VolumeCfg::default();
    let inputs = [
        ("cube4", special::hypercube(4, 1.0), 16.0),
        ("cut_cube3", special::cube_with_cut_corner(3, 0.5), 1.0 - 0.125 / 6.0),
        ("cross3", special::cross_polytope(3, 1.0), 4.0 / 3.0),
        ("simplex5", special::standard_simplex(5), 1.0 / 120.0),
    ];

    for (name, poly, expected) in inputs {
        let poly = poly.expect("reference polytope is valid");
        for alg in Algorithm::ALL {
            match alg.compute(&poly, &cfg) {
                Ok(report) => {
                    let err = (report.volume - expected).abs();
                    println!(
                        "{name} {alg}: volume={:.12} abs_err={err:.1e} {}",
                        report.volume,
                        serde_json::to_string(&report.stats).unwrap_or_default()
                    );
                }
                Err(e) => println!("{name} {alg}: {e}"),
            }
        }
    }
}
