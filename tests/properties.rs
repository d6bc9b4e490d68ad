use cellgraph::{CellId, CellStore, Function, Value, ValueKind};
use proptest::prelude::*;
use proptest::sample::Index;

/// A plain model of the graph: cell `i` is either a literal or a function of
/// lower-numbered cells, recomputed from scratch on every query.
#[derive(Debug, Clone)]
struct Model {
	literals: Vec<i64>,
	parents: Vec<Option<Vec<usize>>>,
}

impl Model {
	fn new(picks: &[Vec<Index>]) -> Self {
		let parents = picks
			.iter()
			.enumerate()
			.map(|(i, picks)| {
				if i == 0 || picks.is_empty() {
					None
				} else {
					Some(picks.iter().map(|pick| pick.index(i)).collect())
				}
			})
			.collect();

		Model {
			literals: (0..picks.len() as i64).collect(),
			parents,
		}
	}

	fn values(&self) -> Vec<i64> {
		let mut values: Vec<i64> = Vec::with_capacity(self.literals.len());
		for (i, parents) in self.parents.iter().enumerate() {
			let value = match parents {
				None => self.literals[i],
				Some(parents) => mix(i, parents.iter().map(|&p| values[p])),
			};
			values.push(value);
		}
		values
	}

	fn ancestors(&self, id: usize) -> Vec<bool> {
		let mut reachable = vec![false; self.parents.len()];
		let mut stack: Vec<usize> = self.parents[id].iter().flatten().copied().collect();
		while let Some(next) = stack.pop() {
			if !reachable[next] {
				reachable[next] = true;
				stack.extend(self.parents[next].iter().flatten().copied());
			}
		}
		reachable
	}
}

/// Order-sensitive on purpose, so swapped arguments would show up.
fn mix(salt: usize, args: impl Iterator<Item = i64>) -> i64 {
	args.fold(salt as i64, |acc, arg| acc.wrapping_mul(31).wrapping_add(arg))
}

fn mixer(salt: usize, arity: usize) -> Function {
	Function::new(vec![ValueKind::Integer; arity], move |args: &[Value]| {
		mix(salt, args.iter().filter_map(Value::as_integer))
	})
}

/// Builds the model's graph. `reverse` binds cells from the last to the
/// first, so children get bound before their parents are.
fn build(model: &Model, reverse: bool) -> (CellStore, Vec<CellId>) {
	let mut store = CellStore::new();
	let ids: Vec<CellId> = model.literals.iter().map(|&v| store.create(v)).collect();

	let mut order: Vec<usize> = (0..ids.len()).collect();
	if reverse {
		order.reverse();
	}

	for i in order {
		if let Some(parents) = &model.parents[i] {
			let parent_ids: Vec<CellId> = parents.iter().map(|&p| ids[p]).collect();
			store.bind(ids[i], mixer(i, parents.len()), &parent_ids).unwrap();
		}
	}

	(store, ids)
}

fn read_all(store: &CellStore, ids: &[CellId], reverse: bool) -> Vec<i64> {
	let mut values = vec![0; ids.len()];
	let mut order: Vec<usize> = (0..ids.len()).collect();
	if reverse {
		order.reverse();
	}
	for i in order {
		values[i] = store.get::<i64>(ids[i]).unwrap();
	}
	values
}

fn graph_strategy() -> impl Strategy<Value = Vec<Vec<Index>>> {
	prop::collection::vec(prop::collection::vec(any::<Index>(), 0..4), 2..24)
}

fn changes_strategy() -> impl Strategy<Value = Vec<(Index, i64)>> {
	prop::collection::vec((any::<Index>(), -1000_i64..1000), 1..8)
}

proptest! {
	#![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

	#[test]
	fn settled_values_match_from_scratch(picks in graph_strategy(), changes in changes_strategy()) {
		crate::init();

		let mut model = Model::new(&picks);
		let (mut store, ids) = build(&model, false);
		prop_assert_eq!(read_all(&store, &ids, false), model.values());

		for (pick, value) in changes {
			let i = pick.index(ids.len());
			// Assigning a computed cell detaches it.
			model.parents[i] = None;
			model.literals[i] = value;
			store.set_literal(ids[i], value).unwrap();

			prop_assert_eq!(read_all(&store, &ids, true), model.values());
		}
	}

	#[test]
	fn order_independent(picks in graph_strategy(), changes in changes_strategy()) {
		let model = Model::new(&picks);
		let (mut forward, forward_ids) = build(&model, false);
		let (mut backward, backward_ids) = build(&model, true);

		for (pick, value) in changes {
			let i = pick.index(forward_ids.len());
			if model.parents[i].is_some() {
				continue;
			}
			forward.set_literal(forward_ids[i], value).unwrap();
			backward.set_literal(backward_ids[i], value).unwrap();
		}

		let a = read_all(&forward, &forward_ids, false);
		let b = read_all(&backward, &backward_ids, true);
		prop_assert_eq!(a, b);
	}

	#[test]
	fn depends_on_matches_reachability(picks in graph_strategy()) {
		let model = Model::new(&picks);
		let (store, ids) = build(&model, false);

		for x in 0..ids.len() {
			let reachable = model.ancestors(x);
			for y in 0..ids.len() {
				prop_assert_eq!(store.depends_on(ids[x], ids[y]).unwrap(), reachable[y]);
			}
		}
	}

	#[test]
	fn back_edges_are_rejected(picks in graph_strategy(), edge in (any::<Index>(), any::<Index>())) {
		let model = Model::new(&picks);
		let (mut store, ids) = build(&model, false);
		let before = read_all(&store, &ids, false);

		let child = edge.0.index(ids.len());
		let parent = edge.1.index(ids.len());
		let cyclic = child == parent || model.ancestors(parent)[child];

		let result = store.bind(ids[child], mixer(child, 1), &[ids[parent]]);
		prop_assert_eq!(result.is_err(), cyclic);
		if cyclic {
			prop_assert_eq!(read_all(&store, &ids, false), before);
		}
	}
}
