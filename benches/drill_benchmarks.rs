use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use spellbee::generator::WordSource;
use spellbee::generator::dictionary::{DEFAULT_WORD_LIST, WordBank};
use spellbee::generator::distractors::{misspellings, plausible_distractors};
use spellbee::session::difficulty::{pick_visible_letters, visible_count};
use spellbee::speech::letters::{resolve_alternatives, resolve_letter};

fn bench_letter_resolution(c: &mut Criterion) {
    let transcripts = ["bee", "Double You", "  X-RAY ", "see you later", "zed", "mumble"];

    c.bench_function("resolve_letter (6 transcripts)", |b| {
        b.iter(|| {
            transcripts
                .iter()
                .filter_map(|t| resolve_letter(black_box(t)))
                .count()
        })
    });

    c.bench_function("resolve_alternatives (3 alternatives)", |b| {
        b.iter(|| resolve_alternatives(black_box("hmm|aitch|h")))
    });
}

fn bench_visible_letters(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(1);

    c.bench_function("pick_visible_letters (batch of 10)", |b| {
        b.iter(|| {
            for position in 0..10 {
                let count = visible_count(position, 10);
                black_box(pick_visible_letters('m', count, &mut rng));
            }
        })
    });
}

fn bench_distractors(c: &mut Criterion) {
    let bank = WordBank::load(DEFAULT_WORD_LIST);
    let corpus = bank.words().to_vec();
    let mut rng = SmallRng::seed_from_u64(2);

    c.bench_function("misspellings (teddy bear)", |b| {
        b.iter(|| misspellings(black_box("teddy bear")))
    });

    c.bench_function("plausible_distractors (k=2, full corpus)", |b| {
        b.iter(|| plausible_distractors(black_box("elephant"), 2, &corpus, &mut rng))
    });

    let mut source = bank.clone();
    c.bench_function("sample_batch (10 words)", |b| {
        b.iter(|| source.sample_batch(black_box(10), &mut rng))
    });
}

criterion_group!(benches, bench_letter_resolution, bench_visible_letters, bench_distractors);
criterion_main!(benches);
