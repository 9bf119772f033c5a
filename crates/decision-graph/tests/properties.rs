//! Property-based checks of the invariants that must hold for every compiled
//! graph and every answer sequence run against it (§8): determinism, and a
//! trace that always starts at the graph's own start node.

use decision_graph::ast::{AskAnswer, AstNode};
use decision_graph::compile;
use decision_graph::interpreter::{Interpreter, InterpreterLimits, RunState};
use proptest::prelude::*;
use tagspace_core::CompoundType;

/// Builds a linear yes/no chart of `depth` Ask nodes terminating in an End,
/// and returns it alongside the `yes`/`no` choice at each step.
fn chart_with_choices(choices: &[bool]) -> Vec<AstNode> {
    let mut program = vec![AstNode::End {
        id: Some("END".to_string()),
    }];
    for (i, &take_yes) in choices.iter().enumerate().rev() {
        let answer_text = if take_yes { "yes" } else { "no" };
        program = vec![AstNode::Ask {
            id: Some(format!("q{i}")),
            text: format!("question {i}"),
            terms: Vec::new(),
            answers: vec![AskAnswer {
                text: answer_text.to_string(),
                subgraph: program,
            }],
        }];
    }
    program
}

fn run_to_completion(
    graph: &decision_graph::DecisionGraph,
    choices: &[bool],
) -> Vec<String> {
    let mut interpreter = Interpreter::start(graph, InterpreterLimits::default()).unwrap();
    for &take_yes in choices {
        match interpreter.state() {
            RunState::AwaitingAnswer { .. } => {
                interpreter.answer(if take_yes { "yes" } else { "no" }).unwrap();
            }
            other => panic!("expected awaiting input, got {other:?}"),
        }
    }
    interpreter.trace().to_vec()
}

proptest! {
    #[test]
    fn same_graph_and_answers_always_produce_the_same_trace(choices in proptest::collection::vec(any::<bool>(), 1..8)) {
        let tag_space = CompoundType::new("Root", []);
        let graph = compile(chart_with_choices(&choices), &tag_space, None).unwrap();

        let first = run_to_completion(&graph, &choices);
        let second = run_to_completion(&graph, &choices);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn trace_is_never_empty_and_starts_at_the_graphs_start_node(choices in proptest::collection::vec(any::<bool>(), 0..8)) {
        let tag_space = CompoundType::new("Root", []);
        let graph = compile(chart_with_choices(&choices), &tag_space, None).unwrap();
        let trace = run_to_completion(&graph, &choices);
        prop_assert!(!trace.is_empty());
        prop_assert_eq!(&trace[0], graph.start());
    }
}
