use std::hint::black_box;
use std::path::PathBuf;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use episode_bump::episode::{Candidate, CandidateId, EpisodeToken, Selection, preview};

fn candidates(count: usize) -> Vec<Candidate> {
    (0..count)
        .filter_map(|index| {
            let name = format!(
                "Some.Show.S{:02}E{:02}.1080p.WEB-DL.x264.mkv",
                index / 20 + 1,
                index % 20 + 1
            );
            let token = EpisodeToken::find(&name)?;
            Some(Candidate::new(CandidateId(index), PathBuf::from("/media/show"), name, token))
        })
        .collect()
}

fn bench_token(c: &mut Criterion) {
    let names = [
        "Show.S01E05.720p.mkv",
        "show.s2024e1234.mp4",
        "Movie.Without.Token.2024.mkv",
        "Documentary.Part.S1E1.Extras.S02E03.avi",
    ];
    c.bench_function("token_find", |b| {
        b.iter(|| {
            for name in names {
                black_box(EpisodeToken::find(black_box(name)));
            }
        });
    });
}

fn bench_preview(c: &mut Criterion) {
    let mut group = c.benchmark_group("preview");
    for count in [10, 100, 1000] {
        let candidates = candidates(count);
        let selection: Selection = candidates.iter().map(Candidate::id).collect();
        group.bench_with_input(BenchmarkId::from_parameter(count), &candidates, |b, candidates| {
            b.iter(|| preview(black_box(candidates), &selection, black_box(-3)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_token, bench_preview);
criterion_main!(benches);
