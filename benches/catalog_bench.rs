use adat_merge::cataloger::ArchiveFact;
use adat_merge::scanner::{self, ScanState};
use adat_merge::InstanceCatalog;
use criterion::{Criterion, black_box, criterion_group, criterion_main};

fn benchmark_facts(runs: usize) -> Vec<ArchiveFact> {
    let mut facts = Vec::new();
    for run in 0..runs {
        let file = format!("run_{:03}.adat", run);
        for function in 1..=55 {
            for dimension in [2, 3, 5, 10, 20, 40] {
                for instance in 1..=10 {
                    facts.push(ArchiveFact::new(&file, "bbob-biobj", function, dimension, instance));
                }
            }
        }
    }
    facts
}

fn benchmark_block(lines: usize) -> Vec<String> {
    let mut block = vec![
        "% instance = 1, name = bbob-biobj_f01_i01_d02\n".to_string(),
        "% function evaluation | 2 objectives | 2 variables\n".to_string(),
    ];
    for i in 0..lines {
        block.push(format!("{}\t{:.6}\t{:.6}\t0.1\t0.2\n", i, i as f64 * 0.5, 1000.0 - i as f64));
    }
    block.push("% instance = 2, name = bbob-biobj_f01_i02_d02\n".to_string());
    block
}

fn bench_catalog_from_facts(c: &mut Criterion) {
    let facts = benchmark_facts(5);

    c.bench_function("catalog_from_facts", |b| {
        b.iter(|| InstanceCatalog::from_facts(black_box(facts.clone())))
    });
}

fn bench_scanner_block(c: &mut Criterion) {
    let block = benchmark_block(10_000);

    c.bench_function("scanner_block", |b| {
        b.iter(|| {
            let mut state = ScanState::Searching;
            let mut emitted = 0usize;
            for line in &block {
                let (next, action) = scanner::step(state, black_box(line), 1).unwrap();
                state = next;
                if matches!(action, scanner::ScanAction::Emit(_)) {
                    emitted += 1;
                }
            }
            emitted
        })
    });
}

criterion_group!(benches, bench_catalog_from_facts, bench_scanner_block);
criterion_main!(benches);
