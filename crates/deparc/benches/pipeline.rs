use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use deparc::render::{
    HtmlRenderOptions, LayoutOptions, SvgRenderOptions, layout_sentence, render_html, render_svg,
};
use deparc::{DependencyStats, Sentence, ValidationOptions, sentence_from_json};

fn fixtures() -> Vec<(&'static str, &'static str)> {
    vec![
        (
            "wo_chi_mian",
            include_str!("../../../fixtures/canonical/wo_chi_mian.json"),
        ),
        (
            "long_sentence",
            include_str!("../../../fixtures/canonical/long_sentence.json"),
        ),
    ]
}

fn parse(json: &str) -> Sentence {
    sentence_from_json(json, ValidationOptions::strict()).unwrap()
}

fn bench_render_svg(c: &mut Criterion) {
    let layout = LayoutOptions::default();
    let svg_opts = SvgRenderOptions::default();

    let mut group = c.benchmark_group("render_svg");
    for (name, input) in fixtures() {
        group.bench_function(name, |b| {
            b.iter_batched(
                || input,
                |json| {
                    let sentence = parse(json);
                    let diagram = layout_sentence(&sentence, &layout).unwrap();
                    let _svg = render_svg(&diagram, &layout.theme, &svg_opts);
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_stats_only(c: &mut Criterion) {
    let mut group = c.benchmark_group("stats_only");
    for (name, input) in fixtures() {
        let sentence = parse(input);
        group.bench_function(name, |b| {
            b.iter(|| DependencyStats::compute(&sentence));
        });
    }
    group.finish();
}

fn bench_render_html(c: &mut Criterion) {
    let layout = LayoutOptions::default();
    let html_opts = HtmlRenderOptions::default();

    let mut group = c.benchmark_group("render_html");
    for (name, input) in fixtures() {
        let sentence = parse(input);
        let stats = DependencyStats::compute(&sentence);
        let diagram = layout_sentence(&sentence, &layout).unwrap();
        group.bench_function(name, |b| {
            b.iter(|| render_html(&diagram, &stats, &layout.theme, &html_opts));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_render_svg, bench_stats_only, bench_render_html);
criterion_main!(benches);
