//! Integration tests for the dispatch engine: comment/blank filtering, scope
//! resolution, dispatch, and root collection.

mod common;

use common::{feed, root_summaries, standard_engine};
use trellis::{cli::output::TraceBuffer, engine::Session, Engine, TrellisError};

#[test]
fn collects_roots_with_children_in_input_order() {
    let engine = standard_engine();
    let session = feed(
        &engine,
        &[
            "PORT 80",
            "  ALLOW 1.2.3.4",
            "  ALLOW 5.6.7.8",
            "PORT 443",
            "  DENY 0.0.0.0/0",
        ],
    );

    let roots = root_summaries(&session);
    assert_eq!(roots.len(), 2);

    assert_eq!(roots[0].token, "PORT");
    assert_eq!(roots[0].args, vec!["80"]);
    assert_eq!(roots[0].children.len(), 2);
    assert_eq!(roots[0].children[0].token, "ALLOW");
    assert_eq!(roots[0].children[0].args, vec!["1.2.3.4"]);
    assert_eq!(roots[0].children[1].args, vec!["5.6.7.8"]);

    assert_eq!(roots[1].args, vec!["443"]);
    assert_eq!(roots[1].children.len(), 1);
    assert_eq!(roots[1].children[0].token, "DENY");
    assert_eq!(roots[1].children[0].args, vec!["0.0.0.0/0"]);
}

#[test]
fn scope_stack_empties_when_indentation_returns_to_zero() {
    let engine = standard_engine();
    let mut session = feed(
        &engine,
        &["PORT 80", "  ALLOW 1.2.3.4", "    DENY 0.0.0.0/0"],
    );
    assert_eq!(session.open_scopes(), 2);

    session.feed_line(4, "PORT 443").unwrap();
    assert_eq!(session.open_scopes(), 0);
}

#[test]
fn comment_lines_never_alter_scope() {
    let engine = standard_engine();
    let session = feed(
        &engine,
        &[
            "// leading comment",
            "PORT 80",
            "        # deeply indented comment",
            "  ALLOW 1.2.3.4",
            "; comment at column zero",
            "  ALLOW 5.6.7.8",
        ],
    );

    let roots = root_summaries(&session);
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0].children.len(), 2);
}

#[test]
fn blank_lines_are_discarded_without_closing_scope() {
    let engine = standard_engine();
    let session = feed(
        &engine,
        &["PORT 80", "  ALLOW 1.2.3.4", "", "  ALLOW 5.6.7.8"],
    );

    let roots = root_summaries(&session);
    assert_eq!(roots[0].children.len(), 2);
}

#[test]
fn unknown_token_reports_filename_and_line() {
    let engine = standard_engine();
    let result = engine.parse_source("ports.rules", "PORT 80\n  ALLOW 1.2.3.4\nFOO bar\n", None);

    match result.unwrap_err() {
        TrellisError::UnknownToken {
            token,
            filename,
            line,
            ..
        } => {
            assert_eq!(token, "FOO");
            assert_eq!(filename, "ports.rules");
            assert_eq!(line, 3);
        }
        other => panic!("expected UnknownToken, got {:?}", other),
    }
}

#[test]
fn parsing_before_init_fails() {
    let engine = Engine::new();
    assert!(matches!(
        Session::new(&engine, "test.rules"),
        Err(TrellisError::Uninitialized)
    ));
    assert!(matches!(
        engine.parse_source("test.rules", "PORT 80\n", None),
        Err(TrellisError::Uninitialized)
    ));
}

#[test]
fn indented_first_line_is_a_typed_error() {
    let engine = standard_engine();
    let result = engine.parse_source("test.rules", "  PORT 80\n", None);

    match result.unwrap_err() {
        TrellisError::OrphanIndentation { filename, line } => {
            assert_eq!(filename, "test.rules");
            assert_eq!(line, 1);
        }
        other => panic!("expected OrphanIndentation, got {:?}", other),
    }
}

#[test]
fn indented_first_line_after_comments_is_still_orphan() {
    let engine = standard_engine();
    let result = engine.parse_source("test.rules", "# header\n\n  PORT 80\n", None);
    assert!(matches!(
        result.unwrap_err(),
        TrellisError::OrphanIndentation { line: 3, .. }
    ));
}

#[test]
fn tabs_and_spaces_count_as_single_characters() {
    let engine = standard_engine();
    // One tab and one space are the same depth; the tab-indented child
    // attaches exactly like a space-indented sibling.
    let session = feed(&engine, &["PORT 80", "\tALLOW 1.2.3.4", " DENY 0.0.0.0/0"]);

    let roots = root_summaries(&session);
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0].children.len(), 2);
    assert_eq!(roots[0].children[0].token, "ALLOW");
    assert_eq!(roots[0].children[1].token, "DENY");
}

#[test]
fn whitespace_only_line_dispatches_the_empty_token() {
    let engine = standard_engine();
    let mut session = feed(&engine, &["PORT 80"]);

    match session.feed_line(2, "   ").unwrap_err() {
        TrellisError::UnknownToken { token, line, .. } => {
            assert_eq!(token, "");
            assert_eq!(line, 2);
        }
        other => panic!("expected UnknownToken, got {:?}", other),
    }
}

#[test]
fn depth_is_assigned_retroactively_by_the_first_child() {
    let engine = standard_engine();
    let session = feed(
        &engine,
        &["PORT 80", "  ALLOW 1.2.3.4", "    DENY 0.0.0.0/0"],
    );

    let roots = root_summaries(&session);
    // The port's owned level became 2 when ALLOW appeared; the ALLOW's
    // became 4 when DENY appeared below it.
    assert_eq!(roots[0].depth, 2);
    assert_eq!(roots[0].children[0].depth, 4);
    assert_eq!(roots[0].children[0].children[0].token, "DENY");
}

#[test]
fn dedent_returns_to_the_enclosing_scope() {
    let engine = standard_engine();
    let session = feed(
        &engine,
        &[
            "PORT 80",
            "  ALLOW 1.2.3.4",
            "    DENY 0.0.0.0/0",
            "  ALLOW 5.6.7.8",
        ],
    );

    let roots = root_summaries(&session);
    assert_eq!(roots[0].children.len(), 2);
    assert_eq!(roots[0].children[0].children.len(), 1);
    assert_eq!(roots[0].children[1].children.len(), 0);
}

#[test]
fn nested_root_type_nodes_are_still_collected_in_encounter_order() {
    let engine = standard_engine();
    let session = feed(&engine, &["PORT 80", "  PORT 8080", "PORT 443"]);

    let roots = root_summaries(&session);
    assert_eq!(roots.len(), 3);
    assert_eq!(roots[0].args, vec!["80"]);
    assert_eq!(roots[1].args, vec!["8080"]);
    assert_eq!(roots[2].args, vec!["443"]);
    // The nested port is also a child of the outer one.
    assert_eq!(roots[0].children.len(), 1);
    assert_eq!(roots[0].children[0].args, vec!["8080"]);
}

#[test]
fn missing_parameter_reports_name_and_position() {
    let engine = standard_engine();
    let result = engine.parse_source("test.rules", "PORT 80\n  ALLOW\n", None);

    match result.unwrap_err() {
        TrellisError::MissingParameter {
            name,
            filename,
            line,
        } => {
            assert_eq!(name, "source");
            assert_eq!(filename, "test.rules");
            assert_eq!(line, 2);
        }
        other => panic!("expected MissingParameter, got {:?}", other),
    }
}

#[test]
fn internal_whitespace_runs_collapse_before_tokenizing() {
    let engine = standard_engine();
    let session = feed(&engine, &["PORT   80\t tcp"]);

    let roots = root_summaries(&session);
    assert_eq!(roots[0].args, vec!["80", "tcp"]);
}

#[test]
fn trace_sink_sees_lines_and_scope_adjustments() {
    let buffer = TraceBuffer::new();
    let mut engine = standard_engine();
    engine.set_trace_sink(Box::new(buffer.clone()));

    engine
        .parse_source("test.rules", "PORT 80\n  ALLOW 1.2.3.4\nPORT 443\n", None)
        .unwrap();

    let trace = buffer.contents();
    assert!(trace.contains("PORT 80"));
    assert!(trace.contains("scope opened"));
    assert!(trace.contains("scope closed"));
    assert!(trace.contains("dispatching 'ALLOW'"));
}
