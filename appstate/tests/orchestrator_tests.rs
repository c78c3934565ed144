//! Orchestrator contract tests: readiness gating, failure propagation,
//! determinism, and the end-to-end report shape.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use image::{Rgb, RgbImage};

use appstate::{AnalysisOrchestrator, LoadedStages, ModelRegistry, RegistryConfig};
use fundus_pipeline::{
    codec, Enhance, LesionSegmenter, PipelineError, RetinexEnhancer, SaliencyExplainer, Segment,
    SegmentationOutput, SeverityClassifier, StageWeights,
};
use fundus_values::{AnalysisError, DrStage, PatientInfo, StageKind};

fn ready_registry() -> Arc<ModelRegistry> {
    let registry = ModelRegistry::new();
    registry
        .initialize(&RegistryConfig::default())
        .expect("default init");
    Arc::new(registry)
}

fn png_bytes(image: &RgbImage) -> Vec<u8> {
    codec::encode_png(image).expect("encode")
}

fn sample_fundus(width: u32, height: u32) -> RgbImage {
    let mut image = RgbImage::from_pixel(width, height, Rgb([120, 70, 50]));
    for y in 10..16 {
        for x in 10..16 {
            image.put_pixel(x, y, Rgb([210, 40, 30]));
        }
    }
    image
}

/// Enhancer wrapper counting invocations, for "no stage invoked" assertions.
struct CountingEnhancer {
    inner: RetinexEnhancer,
    calls: Arc<AtomicUsize>,
}

impl Enhance for CountingEnhancer {
    fn enhance(&self, image: &RgbImage) -> fundus_pipeline::Result<RgbImage> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.enhance(image)
    }
}

/// Segmenter that always fails, for failure-propagation assertions.
struct BrokenSegmenter;

impl Segment for BrokenSegmenter {
    fn segment(&self, _image: &RgbImage) -> fundus_pipeline::Result<SegmentationOutput> {
        Err(PipelineError::Inference(
            "segmentation head diverged".to_string(),
        ))
    }
}

/// Registry whose enhancer counts calls; remaining stages are the defaults.
fn counting_registry(calls: Arc<AtomicUsize>) -> Arc<ModelRegistry> {
    let weights = StageWeights::default();
    Arc::new(ModelRegistry::from_stages(LoadedStages {
        enhancer: Arc::new(CountingEnhancer {
            inner: RetinexEnhancer::new(&weights.enhancer),
            calls,
        }),
        segmenter: Arc::new(LesionSegmenter::new(&weights.segmenter)),
        classifier: Arc::new(SeverityClassifier::new(&weights.classifier)),
        explainer: Arc::new(SaliencyExplainer::new(&weights.explainer)),
    }))
}

#[test]
fn unready_registry_yields_not_ready_before_any_stage() {
    let registry = Arc::new(ModelRegistry::new());
    let orchestrator = AnalysisOrchestrator::new(registry);

    let bytes = png_bytes(&sample_fundus(32, 32));
    let err = orchestrator
        .run(&bytes, PatientInfo::default())
        .expect_err("must fail");
    assert!(matches!(err, AnalysisError::NotReady));
    assert!(err.failed_stage().is_none(), "never a stage-level error");
}

#[test]
fn failed_registry_yields_not_ready_for_valid_images() {
    let registry = Arc::new(ModelRegistry::new());
    registry
        .initialize(&RegistryConfig {
            weights_path: Some("/nonexistent/weights.toml".into()),
        })
        .expect_err("load must fail");

    let orchestrator = AnalysisOrchestrator::new(registry);
    let bytes = png_bytes(&sample_fundus(32, 32));
    let err = orchestrator
        .run(&bytes, PatientInfo::default())
        .expect_err("must fail");
    assert!(matches!(err, AnalysisError::NotReady));
}

#[test]
fn zero_byte_buffer_is_invalid_input_with_no_stage_invoked() {
    let calls = Arc::new(AtomicUsize::new(0));
    let registry = counting_registry(calls.clone());
    let orchestrator = AnalysisOrchestrator::new(registry);

    let err = orchestrator
        .run(&[], PatientInfo::default())
        .expect_err("must fail");
    assert!(matches!(err, AnalysisError::InvalidInput { .. }));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn corrupt_buffer_is_invalid_input() {
    let orchestrator = AnalysisOrchestrator::new(ready_registry());
    let err = orchestrator
        .run(&[0x00, 0x01, 0x02], PatientInfo::default())
        .expect_err("must fail");
    assert!(matches!(err, AnalysisError::InvalidInput { .. }));
}

#[test]
fn stage_failure_aborts_and_names_the_stage() {
    let weights = StageWeights::default();
    let registry = Arc::new(ModelRegistry::from_stages(LoadedStages {
        enhancer: Arc::new(RetinexEnhancer::new(&weights.enhancer)),
        segmenter: Arc::new(BrokenSegmenter),
        classifier: Arc::new(SeverityClassifier::new(&weights.classifier)),
        explainer: Arc::new(SaliencyExplainer::new(&weights.explainer)),
    }));
    let orchestrator = AnalysisOrchestrator::new(registry);

    let bytes = png_bytes(&sample_fundus(32, 32));
    let err = orchestrator
        .run(&bytes, PatientInfo::default())
        .expect_err("must fail");
    assert_eq!(err.failed_stage(), Some(StageKind::Segment));
    assert!(err.to_string().contains("segmentation head diverged"));
}

#[test]
fn two_runs_over_identical_bytes_are_identical() {
    let orchestrator = AnalysisOrchestrator::new(ready_registry());
    let bytes = png_bytes(&sample_fundus(64, 64));

    let first = orchestrator
        .run(&bytes, PatientInfo::default())
        .expect("first run");
    let second = orchestrator
        .run(&bytes, PatientInfo::default())
        .expect("second run");

    assert_eq!(first.stage, second.stage);
    assert_eq!(first.confidence.to_bits(), second.confidence.to_bits());
    assert_eq!(first.lesion_count, second.lesion_count);
    assert_eq!(first.images.segmentation, second.images.segmentation);
}

#[test]
fn solid_black_image_reports_healthy_retina() {
    let orchestrator = AnalysisOrchestrator::new(ready_registry());
    let bytes = png_bytes(&RgbImage::new(380, 380));

    let report = orchestrator
        .run(&bytes, PatientInfo::default())
        .expect("run");
    assert_eq!(report.lesion_count, 0);
    assert_eq!(report.dr_stage(), DrStage::NoDr);
    assert_eq!(report.dr_stage().index(), 0);
    assert!(report
        .description
        .contains("No signs of diabetic retinopathy"));
}

#[test]
fn successful_report_carries_all_artifacts_and_passthrough() {
    let orchestrator = AnalysisOrchestrator::new(ready_registry());
    let bytes = png_bytes(&sample_fundus(48, 48));
    let patient = PatientInfo::new("Sam Seen", "sam@example.org");

    let report = orchestrator.run(&bytes, patient).expect("run");
    assert!((0.0..=1.0).contains(&report.confidence));
    assert_eq!(report.recommendations.len(), 3);
    assert_eq!(report.patient.name, "Sam Seen");
    assert_eq!(report.patient.email, "sam@example.org");
    for encoded in [
        &report.images.original,
        &report.images.enhanced,
        &report.images.heatmap,
        &report.images.segmentation,
    ] {
        // Each artifact must independently decode back to a valid PNG.
        use base64::Engine as _;
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .expect("valid base64");
        codec::decode(&bytes).expect("valid PNG");
    }
}

#[test]
fn concurrent_runs_share_one_ready_registry() {
    let orchestrator = Arc::new(AnalysisOrchestrator::new(ready_registry()));
    let bytes = Arc::new(png_bytes(&sample_fundus(48, 48)));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let orchestrator = orchestrator.clone();
            let bytes = bytes.clone();
            std::thread::spawn(move || {
                orchestrator
                    .run(&bytes, PatientInfo::default())
                    .expect("run")
            })
        })
        .collect();

    let reports: Vec<_> = handles
        .into_iter()
        .map(|h| h.join().expect("thread"))
        .collect();
    let first = &reports[0];
    for report in &reports[1..] {
        assert_eq!(report.stage, first.stage);
        assert_eq!(report.lesion_count, first.lesion_count);
    }
}
