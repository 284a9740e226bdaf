//! Example: Feeding the dashboard through a channel
//!
//! This example shows how to embed acorn-dash in another program by pushing
//! dashboard snapshots through a channel instead of polling an appliance.
//! A background thread plays a fake appliance whose counters grow every
//! second; the main thread polls the source and prints what it would render.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example channel_source
//! ```

use std::thread;
use std::time::{Duration, Instant};

use acorn_dash::data::CPU_SERIES;
use acorn_dash::{
    ChannelSource, CpuSample, CpuUsage, DashboardSnapshot, DataSource, MetricSample, StatTree,
    TimeSeriesWindow,
};

fn main() {
    println!("Channel source example");
    println!("Generating synthetic appliance data...\n");

    let (tx, mut source) = ChannelSource::create("synthetic-appliance");

    thread::spawn(move || {
        let mut tick = 0i64;

        loop {
            tick += 1;

            let snapshot = DashboardSnapshot {
                statman: vec![
                    MetricSample::new("net.eth0.packets_rx", tick * 120),
                    MetricSample::new("net.eth0.packets_tx", tick * 80),
                    MetricSample::new("net.tcp.connections.active", tick % 7),
                    MetricSample::new("mem.heap.used", 4_096 + tick * 512),
                ],
                cpu_usage: Some(CpuUsage::Percent {
                    idle: 60.0 + (tick % 5) as f64 * 5.0,
                    active: None,
                }),
                logger: vec![format!("tick {}", tick)],
                ..Default::default()
            };

            if tx.send(snapshot).is_err() {
                break; // Receiver dropped
            }

            thread::sleep(Duration::from_secs(1));
        }
    });

    let mut window = match TimeSeriesWindow::configure(CPU_SERIES, 5) {
        Ok(window) => window,
        Err(e) => {
            eprintln!("cannot create CPU window: {}", e);
            return;
        }
    };

    println!("Receiving snapshots (press Ctrl+C to stop):\n");

    loop {
        if let Some(snapshot) = source.poll() {
            match StatTree::build(&snapshot.statman) {
                Ok(tree) => {
                    for path in tree.leaf_paths() {
                        if let Some(value) = tree.find(path).and_then(|n| n.value()) {
                            println!("  {} = {}", path, value);
                        }
                    }
                }
                Err(e) => println!("  bad statistics: {}", e),
            }

            if let Some(usage) = snapshot.cpu_usage {
                let sample = CpuSample::from_usage(&usage);
                if window.push(Instant::now(), sample.series()).is_ok() {
                    let active = window.snapshot().series["active"].clone();
                    println!("  cpu active (last {}): {:?}", active.len(), active);
                }
            }
            println!();
        }

        thread::sleep(Duration::from_millis(100));
    }
}
