use doc_signals::analysis::thresholds::{coverage_status, div_ratio_status, heading_status};
use doc_signals::analysis::{analyze, analyze_semantics, compare_structure, normalize, AnalysisError, SignalStatus};
use doc_signals::models::{SemanticClassification, StructureClassification};

const PAGE_A: &str = r#"<html><body><header><nav><a href="/">Home</a></nav></header>
<main><h1>Docs</h1><p>One</p></main><footer>f</footer></body></html>"#;

const PAGE_B: &str = r#"<html><body><header><nav><a href="/">Home</a></nav></header>
<main><h1>Docs</h1><p>One</p><aside>ad</aside></main><footer>f</footer></body></html>"#;

const PAGE_C: &str = r#"<html><body><div><h1>Docs</h1></div></body></html>"#;

#[test]
fn test_normalize_is_deterministic() {
    assert_eq!(normalize(PAGE_A), normalize(PAGE_A));
    assert_eq!(normalize(PAGE_B), normalize(PAGE_B));
}

#[test]
fn test_noise_is_invisible_to_structure() {
    let plain = "<body><main><p>x</p></main></body>";
    let noisy = r#"<body><script>var a = 1;</script><main><style>p{}</style><p>x</p>
        <svg><path d="M0"/></svg><noscript><div>js off</div></noscript></main></body>"#;

    assert_eq!(normalize(plain), normalize(noisy));
    assert_eq!(
        compare_structure(&[plain, noisy]).unwrap().classification,
        StructureClassification::Deterministic
    );
}

#[test]
fn test_comparator_is_order_independent() {
    let forward = compare_structure(&[PAGE_A, PAGE_B, PAGE_C]).unwrap();
    let reversed = compare_structure(&[PAGE_C, PAGE_B, PAGE_A]).unwrap();

    assert_eq!(forward.difference_count, reversed.difference_count);
    assert_eq!(forward.classification, reversed.classification);
}

#[test]
fn test_classification_boundaries() {
    let same = compare_structure(&[PAGE_A, PAGE_A, PAGE_A]).unwrap();
    assert_eq!(same.difference_count, 0);
    assert_eq!(same.classification, StructureClassification::Deterministic);

    let one = compare_structure(&[PAGE_A, PAGE_B]).unwrap();
    assert_eq!(one.difference_count, 1);
    assert_eq!(one.classification, StructureClassification::MostlyDeterministic);

    let all_distinct = compare_structure(&[PAGE_A, PAGE_B, PAGE_C]).unwrap();
    assert_eq!(all_distinct.difference_count, 3);
    assert_eq!(all_distinct.classification, StructureClassification::Unstable);
}

#[test]
fn test_one_outlier_among_three_counts_both_pairs() {
    let result = compare_structure(&[PAGE_A, PAGE_A, PAGE_B]).unwrap();
    assert_eq!(result.difference_count, 2);
    assert_eq!(result.classification, StructureClassification::Unstable);
}

#[test]
fn test_heading_skip_detection() {
    let skipped = analyze_semantics("<body><h1>a</h1><h3>b</h3></body>");
    assert!(skipped.headings.has_skips);

    let back_up = analyze_semantics("<body><h1>a</h1><h2>b</h2><h3>c</h3><h2>d</h2></body>");
    assert!(!back_up.headings.has_skips);
}

#[test]
fn test_wrapping_in_landmarks_never_lowers_coverage() {
    let bare = analyze_semantics("<body><main><p>a</p></main><div><p>b</p></div></body>");
    let wrapped = analyze_semantics("<body><main><p>a</p></main><aside><div><p>b</p></div></aside></body>");

    assert!(wrapped.landmarks.coverage_percent >= bare.landmarks.coverage_percent);
    assert_eq!(wrapped.landmarks.coverage_percent, 100);
}

#[test]
fn test_role_counts_as_landmark() {
    let result = analyze_semantics(r#"<body><div role="main"><p>a</p></div></body>"#);
    assert!(result.landmarks.found.contains("main"));
    assert_eq!(result.landmarks.coverage_percent, 100);
}

#[test]
fn test_div_ratio_bounds() {
    for html in [
        "<body></body>",
        "<body><div><span>a</span></div></body>",
        "<body><main><p>a</p></main></body>",
        PAGE_A,
        PAGE_C,
    ] {
        let ratio = analyze_semantics(html).div_ratio;
        assert!((0.0..=1.0).contains(&ratio), "{ratio} out of range for {html}");
    }
    assert_eq!(analyze_semantics("<body><div><span>a</span></div></body>").div_ratio, 1.0);
}

#[test]
fn test_link_issue_counting() {
    let html = r#"<body>
        <a href="/a">Click here</a>
        <a href="/b">  READ MORE...  </a>
        <a href="/c">   </a>
        <a href="/d">Pricing for teams</a>
        <a name="anchor">here</a>
    </body>"#;

    assert_eq!(analyze_semantics(html).link_issues, 3);
}

#[test]
fn test_classification_agrees_with_signal_bands() {
    for html in [
        PAGE_A,
        PAGE_B,
        PAGE_C,
        "<body></body>",
        "<body><div><span>a</span><span>b</span></div></body>",
        r#"<html lang="en"><body><header>h</header><main><h1>t</h1><h2>s</h2><p>a</p><p>b</p></main><footer>f</footer></body></html>"#,
    ] {
        let s = analyze_semantics(html);
        let coverage = coverage_status(s.landmarks.coverage_percent);
        let containers = div_ratio_status(s.div_ratio);
        let headings = heading_status(&s.headings);

        let expected = if [coverage, containers, headings].iter().all(|b| *b == SignalStatus::Good) {
            SemanticClassification::Explicit
        } else if coverage == SignalStatus::Issue || containers == SignalStatus::Issue {
            SemanticClassification::Opaque
        } else {
            SemanticClassification::Partial
        };
        assert_eq!(s.classification, expected, "{html}");
    }
}

#[test]
fn test_orchestrator_is_idempotent() {
    let samples = [PAGE_A, PAGE_B, PAGE_A];
    let first = analyze(&samples, "https://example.com/").unwrap();
    let second = analyze(&samples, "https://example.com/").unwrap();

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_empty_batch_is_rejected() {
    let none: [&str; 0] = [];
    assert_eq!(analyze(&none, "https://example.com/"), Err(AnalysisError::EmptySamples));
}

#[test]
fn test_result_json_uses_camel_case() {
    let result = analyze(&[PAGE_A], "https://example.com/").unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert!(json["semantics"]["headings"]["h1Count"].is_number());
    assert!(json["semantics"]["landmarks"]["coveragePercent"].is_number());
    assert!(json["semantics"]["timeElements"]["withDatetime"].is_number());
    assert_eq!(json["structure"]["classification"], "deterministic");
}
