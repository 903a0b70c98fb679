#![no_main]

use libfuzzer_sys::fuzz_target;
use strand_di::{Container, ContainerOptions, DiError, DiResult, Resolver, ResolverContext};
use std::any::Any;
use std::sync::Arc;

type AnyNode = Arc<dyn Any + Send + Sync>;

// Four nodes whose forward dependency edges come from the input
struct Node<const N: usize>(Vec<AnyNode>);

// Bit index of the edge from -> to, for from < to
fn edge_bit(from: usize, to: usize) -> usize {
    match (from, to) {
        (0, 1) => 0,
        (0, 2) => 1,
        (0, 3) => 2,
        (1, 2) => 3,
        (1, 3) => 4,
        _ => 5,
    }
}

fn resolve_node(r: &ResolverContext<'_>, to: usize) -> DiResult<AnyNode> {
    Ok(match to {
        0 => r.get::<Node<0>>()? as AnyNode,
        1 => r.get::<Node<1>>()? as AnyNode,
        2 => r.get::<Node<2>>()? as AnyNode,
        _ => r.get::<Node<3>>()? as AnyNode,
    })
}

macro_rules! node {
    ($container:expr, $n:literal, $mask:expr) => {{
        let mask: u8 = $mask;
        $container.register_fallible(move |r| {
            let mut deps = Vec::new();
            for to in ($n + 1)..4 {
                if mask & (1 << edge_bit($n, to)) != 0 {
                    deps.push(resolve_node(r, to)?);
                }
            }
            Ok(Node::<$n>(deps))
        })
    }};
}

// Length of the longest dependency path starting at `from`, counting nodes.
fn longest_path(mask: u8, from: usize) -> usize {
    ((from + 1)..4)
        .filter(|&to| mask & (1 << edge_bit(from, to)) != 0)
        .map(|to| longest_path(mask, to))
        .max()
        .unwrap_or(0)
        + 1
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 3 {
        return;
    }

    let mask = data[0] & 0b11_1111;
    let detect_cycles = data[1] & 1 == 0;
    let max_depth = (data[2] as usize % 8) + 1;
    let options = ContainerOptions::new()
        .with_cycle_detection(detect_cycles)
        .with_max_depth(max_depth);

    let container = Container::with_options(options);
    let container = node!(container, 0, mask);
    let container = node!(container, 1, mask);
    let container = node!(container, 2, mask);
    let container = node!(container, 3, mask);

    // Edges only point forward, so the graph is acyclic: a resolution fails
    // exactly when its longest path is deeper than the limit.
    let results = [
        container.get::<Node<0>>().map(|_| ()),
        container.get::<Node<1>>().map(|_| ()),
        container.get::<Node<2>>().map(|_| ()),
        container.get::<Node<3>>().map(|_| ()),
    ];
    for (from, result) in results.into_iter().enumerate() {
        match result {
            Ok(()) => assert!(longest_path(mask, from) <= max_depth),
            Err(DiError::DepthExceeded(depth)) => {
                assert_eq!(depth, max_depth);
                assert!(longest_path(mask, from) > max_depth);
            }
            Err(other) => panic!("unexpected resolution error: {}", other),
        }
    }
});
