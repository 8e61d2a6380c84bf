use crate::{
    render, render_html, resolve_overlaps, Color, ColorTable, CombinedSpan, Domain, EntityRecord,
    InvalidSpanReason, NerResponse, RenderError, Segment, Span, SpanRef, TextSpan,
    COMBINED_BIO_SYMPTOM,
};

fn open(color: &str) -> String {
    format!(
        "<span style=\"background-color: {}; padding: 2px; border-radius: 3px; color: white;\">",
        color
    )
}

fn plain(text: &str, start: usize, end: usize, label: &str) -> Span {
    TextSpan::from_text(text, start, end, label).into()
}

fn bio_symptom(text: &str, bio: (usize, usize), symptom: (usize, usize)) -> Span {
    CombinedSpan::new(
        COMBINED_BIO_SYMPTOM,
        TextSpan::from_text(text, bio.0, bio.1, "BIOLOGICAL_STRUCTURE"),
        TextSpan::from_text(text, symptom.0, symptom.1, "SIGN_SYMPTOM"),
    )
    .into()
}

fn medical() -> &'static ColorTable {
    Domain::Medical.color_table()
}

// ============================================================================
// Coverage
// ============================================================================

#[test]
fn no_spans_returns_text_unchanged() {
    for text in ["", "头痛伴恶心", "  two  spaces\tand a tab\n", "emoji 🩺 ok"].iter() {
        let annotated = render(text, &[], medical()).unwrap();
        assert_eq!(annotated.plain_text(), *text);
        assert_eq!(annotated.to_html(), *text);
    }
}

#[test]
fn untouched_middle_character() {
    let text = "头痛伴恶心";
    let spans = vec![plain(text, 0, 2, "SIGN_SYMPTOM"), plain(text, 3, 4, "OTHER")];

    let html = render_html(text, &spans, medical()).unwrap();
    let expected = format!(
        "{}头痛<sub>SIGN_SYMPTOM</sub></span>伴{}恶<sub>OTHER</sub></span>心",
        open("#FF0000"),
        open("#666666"),
    );
    assert_eq!(html, expected);
}

#[test]
fn adjacent_containers() {
    let text = "头痛伴恶心";
    let spans = vec![plain(text, 0, 2, "SIGN_SYMPTOM"), plain(text, 2, 3, "OTHER")];

    let html = render_html(text, &spans, medical()).unwrap();
    let expected = format!(
        "{}头痛<sub>SIGN_SYMPTOM</sub></span>{}伴<sub>OTHER</sub></span>恶心",
        open("#FF0000"),
        open("#666666"),
    );
    assert_eq!(html, expected);
}

#[test]
fn stripping_markup_reconstructs_text() {
    let text = "患者主诉头痛伴恶心呕吐3天，既往有高血压病史。";
    let spans = vec![
        plain(text, 4, 6, "SIGN_SYMPTOM"),
        plain(text, 7, 9, "SIGN_SYMPTOM"),
        plain(text, 9, 11, "SIGN_SYMPTOM"),
        plain(text, 11, 13, "DURATION"),
        plain(text, 17, 20, "DISEASE_DISORDER"),
        plain(text, 20, 22, "HISTORY"),
    ];
    let annotated = render(text, &spans, medical()).unwrap();
    assert_eq!(annotated.plain_text(), text);
    assert_eq!(annotated.marks().count(), 6);
}

#[test]
fn whitespace_and_ascii_preserved() {
    let text = "Pt.  reports\tsevere pain 🩺 in left arm.\n";
    let spans = vec![
        plain(text, 13, 19, "SEVERITY"),
        plain(text, 20, 24, "SIGN_SYMPTOM"),
        plain(text, 35, 38, "BIOLOGICAL_STRUCTURE"),
    ];
    let annotated = render(text, &spans, medical()).unwrap();
    assert_eq!(annotated.plain_text(), text);

    let gaps: Vec<&str> = annotated
        .segments
        .iter()
        .filter_map(|segment| match segment {
            Segment::Text { text } => Some(text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(gaps, vec!["Pt.  reports\t", " ", " 🩺 in left ", ".\n"]);
}

#[test]
fn disjoint_spans_in_any_input_order() {
    let text = "头痛伴恶心呕吐";
    let a = plain(text, 0, 2, "SIGN_SYMPTOM");
    let b = plain(text, 3, 4, "SIGN_SYMPTOM");
    let c = plain(text, 5, 7, "SIGN_SYMPTOM");

    let expected = render(text, &[a.clone(), b.clone(), c.clone()], medical()).unwrap();
    let orders = vec![
        vec![a.clone(), c.clone(), b.clone()],
        vec![b.clone(), a.clone(), c.clone()],
        vec![b.clone(), c.clone(), a.clone()],
        vec![c.clone(), a.clone(), b.clone()],
        vec![c, b, a],
    ];
    for spans in orders {
        assert_eq!(render(text, &spans, medical()).unwrap(), expected);
    }
}

#[test]
fn input_is_not_mutated() {
    let text = "头痛伴恶心";
    let spans = vec![plain(text, 3, 4, "A"), plain(text, 0, 2, "B")];
    let before = spans.clone();
    render(text, &spans, medical()).unwrap();
    assert_eq!(spans, before);
}

// ============================================================================
// Combined spans
// ============================================================================

#[test]
fn combined_span_html() {
    let text = "患者头部剧烈疼痛。";
    let spans = vec![bio_symptom(text, (2, 4), (6, 8))];

    let html = render_html(text, &spans, medical()).unwrap();
    let expected = format!(
        "患者{}<span style=\"border-bottom: 2px solid #009688;\">头部<sub>BIOLOGICAL_STRUCTURE</sub></span>剧烈\
         <span style=\"border-bottom: 2px solid #FF0000;\">疼痛<sub>SIGN_SYMPTOM</sub></span>\
         <sub>BIOLOGICAL_STRUCTURE+SIGN_SYMPTOM</sub></span>。",
        open("#FF4500"),
    );
    assert_eq!(html, expected);
}

#[test]
fn combined_span_decomposition() {
    let text = "右下腹 疼痛";
    let spans = vec![bio_symptom(text, (0, 3), (4, 6))];
    let annotated = render(text, &spans, medical()).unwrap();

    match annotated.segments.as_slice() {
        [Segment::Combined(mark)] => {
            assert_eq!(mark.caption, "BIOLOGICAL_STRUCTURE+SIGN_SYMPTOM");
            assert_eq!(mark.first.surface_text, "右下腹");
            assert_eq!(mark.between, " ");
            assert_eq!(mark.second.surface_text, "疼痛");
            assert_eq!(mark.color.as_str(), "#FF4500");
            assert_eq!(mark.first.color.as_str(), "#009688");
            assert_eq!(mark.second.color.as_str(), "#FF0000");
        }
        other => panic!("expected one combined segment, got {:?}", other),
    }

    let html = annotated.to_html();
    let first = html.find("右下腹").unwrap();
    let second = html.find("疼痛").unwrap();
    assert!(first < second);
}

#[test]
fn combined_range_wider_than_constituents() {
    let text = "左侧手臂轻微麻木感";
    let combined = CombinedSpan::new(
        COMBINED_BIO_SYMPTOM,
        TextSpan::from_text(text, 2, 4, "BIOLOGICAL_STRUCTURE"),
        TextSpan::from_text(text, 6, 8, "SIGN_SYMPTOM"),
    )
    .with_range(0, 9);
    let annotated = render(text, &[Span::from(combined)], medical()).unwrap();

    match annotated.segments.as_slice() {
        [Segment::Combined(mark)] => {
            assert_eq!(mark.leading, "左侧");
            assert_eq!(mark.between, "轻微");
            assert_eq!(mark.trailing, "感");
        }
        other => panic!("expected one combined segment, got {:?}", other),
    }
    assert_eq!(annotated.plain_text(), text);
}

#[test]
fn combined_next_to_plain_spans() {
    let text = "头部疼痛伴恶心";
    let spans = vec![plain(text, 5, 7, "SIGN_SYMPTOM"), bio_symptom(text, (0, 2), (2, 4))];
    let annotated = render(text, &spans, medical()).unwrap();
    let labels: Vec<_> = annotated.marks().map(|mark| mark.label()).collect();
    assert_eq!(labels, vec![COMBINED_BIO_SYMPTOM, "SIGN_SYMPTOM"]);
    assert_eq!(annotated.plain_text(), text);
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn out_of_bounds_span_fails_whole_call() {
    let text = "头痛伴恶心";
    let spans = vec![plain(text, 0, 2, "SIGN_SYMPTOM"), TextSpan::new(3, 6, "OTHER", "恶心").into()];

    match render(text, &spans, medical()) {
        Err(RenderError::InvalidSpan { span, reason }) => {
            assert_eq!(span, SpanRef::new(3, 6, "OTHER"));
            assert_eq!(reason, InvalidSpanReason::OutOfBounds { text_len: 5 });
        }
        other => panic!("expected InvalidSpan, got {:?}", other),
    }
}

#[test]
fn bad_constituent_fails_response_with_valid_plain_span() {
    let response = NerResponse {
        text: "头部疼痛伴恶心".to_string(),
        entities: vec![
            EntityRecord::new("SIGN_SYMPTOM", "恶心", 5, 7),
            EntityRecord::new(COMBINED_BIO_SYMPTOM, "头部", 0, 2).with_original_entities(
                EntityRecord::new("BIOLOGICAL_STRUCTURE", "头部", 0, 2),
                EntityRecord::new("SIGN_SYMPTOM", "疼痛", 2, 4),
            ),
        ],
    };

    match response.render(medical()) {
        Err(RenderError::InvalidSpan {
            span,
            reason: InvalidSpanReason::ConstituentOutside { constituent },
        }) => {
            assert_eq!(span, SpanRef::new(0, 2, COMBINED_BIO_SYMPTOM));
            assert_eq!(constituent, SpanRef::new(2, 4, "SIGN_SYMPTOM"));
        }
        other => panic!("expected InvalidSpan, got {:?}", other),
    }
}

#[test]
fn supplied_surface_text_is_shown_as_given() {
    let text = "头痛伴恶心";
    let spans: Vec<Span> = vec![TextSpan::new(0, 2, "SIGN_SYMPTOM", "头疼").into()];
    let annotated = render(text, &spans, medical()).unwrap();
    assert_eq!(annotated.plain_text(), "头疼伴恶心");
    assert_eq!(
        annotated.to_html(),
        format!("{}头疼<sub>SIGN_SYMPTOM</sub></span>伴恶心", open("#FF0000"))
    );
}

#[test]
fn inverted_and_empty_spans_fail() {
    let text = "头痛伴恶心";
    for &(start, end) in [(2, 2), (3, 1)].iter() {
        let spans: Vec<Span> = vec![TextSpan::new(start, end, "X", "").into()];
        assert!(matches!(
            render(text, &spans, medical()),
            Err(RenderError::InvalidSpan {
                reason: InvalidSpanReason::Empty,
                ..
            })
        ));
    }
}

#[test]
fn offsets_count_code_points_not_bytes() {
    // "头痛" is 6 bytes but 2 code points
    let spans: Vec<Span> = vec![TextSpan::new(0, 6, "SIGN_SYMPTOM", "头痛").into()];
    assert!(matches!(
        render("头痛", &spans, medical()),
        Err(RenderError::InvalidSpan { .. })
    ));
}

#[test]
fn crossing_plain_spans_are_rejected() {
    let text = "abcdefgh";
    let spans = vec![plain(text, 0, 3, "A"), plain(text, 2, 5, "B")];

    match render(text, &spans, medical()) {
        Err(RenderError::OverlapViolation { first, second }) => {
            assert_eq!(first, SpanRef::new(0, 3, "A"));
            assert_eq!(second, SpanRef::new(2, 5, "B"));
        }
        other => panic!("expected OverlapViolation, got {:?}", other),
    }
}

#[test]
fn nested_plain_spans_are_rejected() {
    let text = "abcdefgh";
    let spans = vec![plain(text, 0, 6, "OUTER"), plain(text, 2, 3, "INNER")];
    assert!(matches!(
        render(text, &spans, medical()),
        Err(RenderError::OverlapViolation { .. })
    ));
}

#[test]
fn same_start_overlap_reports_the_shorter_span_first() {
    let text = "abcdefgh";
    let spans = vec![plain(text, 1, 2, "B"), plain(text, 1, 3, "A")];

    match render(text, &spans, medical()) {
        Err(RenderError::OverlapViolation { first, second }) => {
            assert_eq!(first, SpanRef::new(1, 2, "B"));
            assert_eq!(second, SpanRef::new(1, 3, "A"));
        }
        other => panic!("expected OverlapViolation, got {:?}", other),
    }
}

#[test]
fn resolved_overlaps_render_cleanly() {
    let text = "血压150/90mmHg";
    let records = vec![
        EntityRecord::new("LAB_VALUE", "150/90mmHg", 2, 12).with_score(0.7),
        EntityRecord::new("QUANTITATIVE_CONCEPT", "150", 2, 5).with_score(0.9),
        EntityRecord::new("DIAGNOSTIC_PROCEDURE", "血压", 0, 2).with_score(0.8),
    ];
    assert!(NerResponse {
        text: text.to_string(),
        entities: records.clone(),
    }
    .render(medical())
    .is_err());

    let response = NerResponse {
        text: text.to_string(),
        entities: resolve_overlaps(records),
    };
    let annotated = response.render(medical()).unwrap();
    let labels: Vec<_> = annotated.marks().map(|mark| mark.label()).collect();
    assert_eq!(labels, vec!["DIAGNOSTIC_PROCEDURE", "LAB_VALUE"]);
}

// ============================================================================
// Colors
// ============================================================================

#[test]
fn unknown_labels_use_the_same_fallback() {
    let text = "甲乙";
    let spans = vec![plain(text, 0, 1, "UNKNOWN_A"), plain(text, 1, 2, "UNKNOWN_B")];
    for _ in 0..3 {
        let annotated = render(text, &spans, medical()).unwrap();
        for segment in &annotated.segments {
            if let Segment::Entity(mark) = segment {
                assert_eq!(mark.color, Color::fallback());
            }
        }
    }
}

#[test]
fn caller_supplies_the_color_table() {
    let text = "营收为 890 亿美元";
    let spans = vec![plain(text, 4, 11, "CURRENCY")];

    let financial = render_html(text, &spans, Domain::Financial.color_table()).unwrap();
    assert!(financial.contains("#4CAF50"));

    let medical_html = render_html(text, &spans, medical()).unwrap();
    assert!(medical_html.contains("#666666"));

    let custom = |_: &str| Color::parse("#123456").unwrap();
    assert!(render_html(text, &spans, &custom).unwrap().contains("#123456"));
}

// ============================================================================
// Terminal display
// ============================================================================

#[test]
fn display_plain_spans() {
    let text = "患者主诉头痛伴恶心";
    let spans = vec![plain(text, 4, 6, "SIGN_SYMPTOM"), plain(text, 7, 9, "SIGN_SYMPTOM")];
    let annotated = render(text, &spans, medical()).unwrap();

    insta::assert_snapshot!(annotated.display().to_string(), @r###"
    患者主诉头痛伴恶心
            ╰──╯SIGN_SYMPTOM
                  ╰──╯SIGN_SYMPTOM
    "###);
}

#[test]
fn display_ascii_spans() {
    let text = "pain in arm";
    let spans = vec![plain(text, 0, 4, "SIGN_SYMPTOM"), plain(text, 8, 11, "BIOLOGICAL_STRUCTURE")];
    let annotated = render(text, &spans, medical()).unwrap();

    insta::assert_snapshot!(annotated.display().to_string(), @r###"
    pain in arm
    ╰──╯SIGN_SYMPTOM
            ╰─╯BIOLOGICAL_STRUCTURE
    "###);
}

#[test]
fn display_combined_span() {
    let text = "患者头部剧烈疼痛。";
    let spans = vec![bio_symptom(text, (2, 4), (6, 8))];
    let annotated = render(text, &spans, medical()).unwrap();

    insta::assert_snapshot!(annotated.display().to_string(), @r###"
    患者头部剧烈疼痛。
        ╰──╯BIOLOGICAL_STRUCTURE
                ╰──╯SIGN_SYMPTOM
        ╰──────────╯BIOLOGICAL_STRUCTURE+SIGN_SYMPTOM
    "###);

    insta::assert_snapshot!(annotated.display().without_constituents().to_string(), @r###"
    患者头部剧烈疼痛。
        ╰──────────╯BIOLOGICAL_STRUCTURE+SIGN_SYMPTOM
    "###);
}

#[test]
fn display_without_spans() {
    let annotated = render("头痛", &[], medical()).unwrap();
    insta::assert_snapshot!(annotated.display().to_string(), @"头痛");
}
