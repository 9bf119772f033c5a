use criterion::{black_box, criterion_group, criterion_main, Criterion};

use decision_graph::ast::{AskAnswer, AstNode};
use decision_graph::compile;
use decision_graph::interpreter::{Interpreter, InterpreterLimits};
use tagspace_core::{AtomicType, CompoundType, TagType};

fn tag_space() -> CompoundType {
    CompoundType::new(
        "Incident",
        [(
            "severity".to_string(),
            TagType::Atomic(AtomicType::new("Severity", ["Low", "Medium", "High"])),
        )],
    )
}

/// A chain of `depth` yes/no questions, each nested inside the previous
/// answer's subgraph, terminating in an `End`.
fn linear_program(depth: usize) -> Vec<AstNode> {
    let mut program = vec![AstNode::End { id: None }];
    for i in (0..depth).rev() {
        program = vec![AstNode::Ask {
            id: None,
            text: format!("question {i}?"),
            terms: Vec::new(),
            answers: vec![AskAnswer {
                text: "yes".to_string(),
                subgraph: program,
            }],
        }];
    }
    program
}

fn bench_compile(c: &mut Criterion) {
    let tag_space = tag_space();
    c.bench_function("compile_linear_100", |b| {
        b.iter(|| {
            let program = linear_program(100);
            black_box(compile(program, &tag_space, None).unwrap())
        })
    });
}

fn bench_interpret(c: &mut Criterion) {
    let tag_space = tag_space();
    let graph = compile(linear_program(100), &tag_space, None).unwrap();
    c.bench_function("interpret_linear_100", |b| {
        b.iter(|| {
            let mut interpreter = Interpreter::start(&graph, InterpreterLimits::default()).unwrap();
            loop {
                match interpreter.state() {
                    decision_graph::RunState::AwaitingAnswer { .. } => {
                        interpreter.answer("yes").unwrap();
                    }
                    _ => break,
                }
            }
            black_box(interpreter.trace().len())
        })
    });
}

criterion_group!(benches, bench_compile, bench_interpret);
criterion_main!(benches);
