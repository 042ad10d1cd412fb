use recess::RuntimeBuilder;
use recess::scenario::fib;
use recess::scenario::pipeline::{self, PipelineConfig};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn words(input: &[&str]) -> Vec<String> {
    input.iter().map(|w| w.to_string()).collect()
}

#[test]
fn test_pipeline_splits_accepted_and_rejected() {
    init_logging();
    let rt = RuntimeBuilder::new().build();

    let report = rt
        .block_on(pipeline::run(
            words(&["good", "baad", "ugly"]),
            PipelineConfig::default(),
            |word| word == "good",
            |_| fib(10),
        ))
        .unwrap();

    assert_eq!(report.accepted, vec!["good"]);

    let mut rejected = report.rejected;
    rejected.sort();
    assert_eq!(rejected, vec!["baad", "ugly"]);
}

#[test]
fn test_pipeline_accepts_everything() {
    init_logging();
    let rt = RuntimeBuilder::new().build();

    let input = words(&["one", "two", "three", "four", "five"]);

    let report = rt
        .block_on(pipeline::run(
            input.clone(),
            PipelineConfig::default(),
            |_| true,
            |_| 0,
        ))
        .unwrap();

    assert!(report.rejected.is_empty());

    let mut accepted = report.accepted;
    accepted.sort();
    let mut expected = input;
    expected.sort();
    assert_eq!(accepted, expected);
}

#[test]
fn test_pipeline_with_bounded_queues() {
    init_logging();
    let rt = RuntimeBuilder::new().build();

    let config = PipelineConfig {
        capacity: Some(1),
        ..PipelineConfig::default()
    };

    let report = rt
        .block_on(pipeline::run(
            words(&["a", "bb", "c", "dd", "e", "ff"]),
            config,
            |word| word.len() == 1,
            |n| n as u64,
        ))
        .unwrap();

    assert_eq!(report.accepted.len(), 3);
    assert_eq!(report.rejected.len(), 3);
}

#[test]
fn test_pipeline_empty_input() {
    init_logging();
    let rt = RuntimeBuilder::new().build();

    let report = rt
        .block_on(pipeline::run(
            Vec::new(),
            PipelineConfig::default(),
            |_| true,
            |_| 0,
        ))
        .unwrap();

    assert!(report.accepted.is_empty());
    assert!(report.rejected.is_empty());
}

#[test]
fn test_pipeline_custom_stop_word_passes_through_default() {
    init_logging();
    let rt = RuntimeBuilder::new().build();

    let config = PipelineConfig {
        stop_word: "<<end>>".to_string(),
        ..PipelineConfig::default()
    };

    // With a custom stop word, the default marker is ordinary input.
    let report = rt
        .block_on(pipeline::run(
            words(&["!!!STOP!!!"]),
            config,
            |_| true,
            |_| 0,
        ))
        .unwrap();

    assert_eq!(report.accepted, vec!["!!!STOP!!!"]);
}
