use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use kana_core::{convert_with, ConversionPlan, Transducer};

static INPUTS: &[(&str, &str)] = &[
    ("short", "ｶﾞｷﾞｸﾞ"),
    ("medium", "｢ﾎﾞｰﾙﾍﾟﾝの芯の太さは､0.7mmです｡｣"),
    (
        "long",
        "ﾜｶﾞﾊｲﾊ猫ﾃﾞｱﾙ｡名前ﾊﾏﾀﾞ無ｲ｡ﾄﾞｺﾃﾞ生ﾚﾀｶﾄﾝﾄ見当ｶﾞﾂｶﾇ｡Ｔｈｅ　ｑｕｉｃｋ　ｂｒｏｗｎ　ｆｏｘ　１２３",
    ),
];

static MODES: &[&str] = &["KV", "HV", "rnsKV", "k"];

fn bench_convert(c: &mut Criterion) {
    let mut group = c.benchmark_group("transducer/convert");
    for &mode in MODES {
        let plan = ConversionPlan::compile(mode).unwrap();
        for &(label, text) in INPUTS {
            group.bench_with_input(
                BenchmarkId::new(format!("{mode}/{label}"), text.len()),
                &text,
                |b, &text| {
                    b.iter(|| convert_with(&plan, text.as_bytes()));
                },
            );
        }
    }
    group.finish();
}

fn bench_small_buffers(c: &mut Criterion) {
    let plan = ConversionPlan::compile("KV").unwrap();
    let text = INPUTS[2].1.repeat(32);
    let mut group = c.benchmark_group("transducer/small_buffers");
    for cap in [12usize, 64, 4096] {
        group.bench_with_input(BenchmarkId::from_parameter(cap), &cap, |b, &cap| {
            let mut dst = vec![0u8; cap];
            b.iter(|| {
                let mut t = Transducer::new(plan.clone());
                let src = text.as_bytes();
                let mut pos = 0;
                loop {
                    let p = t.transduce(&src[pos..], &mut dst, true).unwrap();
                    pos += p.consumed;
                    if p.signal == kana_core::Signal::Done {
                        break;
                    }
                }
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_convert, bench_small_buffers);
criterion_main!(benches);
