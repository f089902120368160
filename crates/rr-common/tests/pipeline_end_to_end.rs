mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use common::StaticEmbedder;
use rr_common::export::write_csv;
use rr_common::{Document, EmbeddingError, PipelineError, RankerConfig, RankingPipeline};

const JOB: &str = "Job description: data scientist";

const JANE: &str = "Name: Jane Doe\n\
    Department: Engineering\n\
    Position: Analyst\n\
    Targeted Career Information\n\
    Department: Data Science\n\
    Position: Scientist\n\
    Core Skills\n\
    : Python, SQL\n\
    Projects\n";

const BOB: &str = "Name - Bob Stone\nCore Skills\nTools: Excel\nProjects\n";

const CARL: &str = "no structure here";

fn batch() -> Vec<Document> {
    vec![
        Document::new("job.txt", JOB),
        Document::new("jane.pdf", JANE),
        Document::new("bob.docx", BOB),
        Document::new("carl.pdf", CARL),
    ]
}

fn embedder() -> StaticEmbedder {
    StaticEmbedder::new(
        2,
        &[
            (JOB, vec![1.0, 0.0]),
            (JANE, vec![1.0, 0.0]),
            (BOB, vec![0.0, 1.0]),
            (CARL, vec![-1.0, 0.0]),
        ],
    )
}

fn pipeline_with(provider: Arc<StaticEmbedder>, top_n: usize) -> RankingPipeline {
    RankingPipeline::new(
        provider,
        RankerConfig {
            top_n,
            ..Default::default()
        },
    )
}

#[test]
fn ranks_candidates_and_joins_extracted_fields() {
    let out = pipeline_with(Arc::new(embedder()), 2).run(&batch()).unwrap();

    let ids: Vec<_> = out.top.iter().map(|r| r.document_id.as_str()).collect();
    assert_eq!(ids, vec!["jane.pdf", "bob.docx"]);
    assert!(out.band.is_empty());

    let jane = &out.top[0];
    assert_eq!(jane.rank, 1);
    assert_eq!(jane.score, 1.0);
    assert_eq!(jane.relevance, "100.00%");
    assert_eq!(jane.name, "Jane Doe");
    assert_eq!(jane.previous_department, "Engineering");
    assert_eq!(jane.previous_position, "Analyst");
    assert_eq!(jane.targeted_department, "Data Science");
    assert_eq!(jane.targeted_position, "Scientist");
    assert_eq!(jane.skills, vec!["Python", "SQL"]);

    let bob = &out.top[1];
    assert_eq!(bob.rank, 2);
    assert_eq!(bob.relevance, "0.00%");
    assert_eq!(bob.name, "- Bob Stone");
    assert_eq!(bob.skills, vec!["Excel"]);

    assert_eq!(out.reference_id, "job.txt");
    assert_eq!(out.embedder, "static");
    assert_eq!(out.facets.skills, vec!["Excel", "Python", "SQL"]);
}

#[test]
fn top_one_keeps_band_empty() {
    let out = pipeline_with(Arc::new(embedder()), 1).run(&batch()).unwrap();

    assert_eq!(out.top.len(), 1);
    assert_eq!(out.top[0].document_id, "jane.pdf");
    assert!(out.band.is_empty());
}

#[test]
fn repeated_runs_are_identical() {
    let pipeline = pipeline_with(Arc::new(embedder()), 10);

    let first = pipeline.run(&batch()).unwrap();
    let second = pipeline.run(&batch()).unwrap();

    assert_eq!(first.top, second.top);
    assert_eq!(first.band, second.band);
}

#[test]
fn reference_only_batch_skips_the_provider() {
    let provider = Arc::new(embedder());
    let pipeline = pipeline_with(provider.clone(), 10);

    let out = pipeline.run(&[Document::new("job.txt", JOB)]).unwrap();

    assert!(out.top.is_empty());
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn vector_of_the_wrong_size_is_rejected_before_ranking() {
    let provider = StaticEmbedder::new(
        2,
        &[
            (JOB, vec![1.0, 0.0]),
            (JANE, vec![1.0, 0.0]),
            (BOB, vec![0.0, 1.0, 0.0]),
        ],
    );
    let docs = vec![
        Document::new("job.txt", JOB),
        Document::new("jane.pdf", JANE),
        Document::new("bob.docx", BOB),
    ];

    let err = pipeline_with(Arc::new(provider), 10).run(&docs).unwrap_err();

    match err {
        PipelineError::Embedding(EmbeddingError::InconsistentDimension {
            index,
            expected,
            actual,
        }) => {
            assert_eq!(index, 2);
            assert_eq!(expected, 2);
            assert_eq!(actual, 3);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn reference_of_the_wrong_size_is_rejected() {
    let provider = StaticEmbedder::new(
        3,
        &[(JOB, vec![1.0, 0.0]), (JANE, vec![1.0, 0.0, 0.0])],
    );
    let docs = vec![Document::new("job.txt", JOB), Document::new("jane.pdf", JANE)];

    let err = pipeline_with(Arc::new(provider), 10).run(&docs).unwrap_err();

    assert!(matches!(
        err,
        PipelineError::Embedding(EmbeddingError::InconsistentDimension { index: 0, .. })
    ));
}

#[test]
fn redefined_band_collects_near_threshold_candidates() {
    let provider = StaticEmbedder::new(
        2,
        &[
            ("job", vec![1.0, 0.0]),
            ("best", vec![1.0, 0.0]),
            ("near", vec![0.505, 0.8629]),
            ("far", vec![0.0, 1.0]),
        ],
    );
    let docs = vec![
        Document::new("j", "job"),
        Document::new("b", "best"),
        Document::new("n", "near"),
        Document::new("f", "far"),
    ];
    let mut config = RankerConfig {
        top_n: 1,
        ..Default::default()
    };
    config.band.min = 0.50;
    config.band.max = 0.51;

    let out = RankingPipeline::new(Arc::new(provider), config).run(&docs).unwrap();

    assert_eq!(out.top.len(), 1);
    assert_eq!(out.band.len(), 1);
    assert_eq!(out.band[0].document_id, "n");
    assert_eq!(out.band[0].rank, 1);
    assert!(out.band[0].relevance.starts_with("50."));
}

#[test]
fn csv_export_of_pipeline_output() {
    let out = pipeline_with(Arc::new(embedder()), 10).run(&batch()).unwrap();
    let mut buf = Vec::new();

    write_csv(&out.top, &mut buf).unwrap();

    let text = String::from_utf8(buf).unwrap();
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(
        lines[1],
        "1,jane.pdf,100.00%,Engineering,Analyst,Data Science,Scientist,\"Python, SQL\""
    );
    assert!(lines[3].starts_with("3,carl.pdf,-100.00%,"));
}
