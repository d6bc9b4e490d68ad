use std::collections::BTreeSet;

use cellgraph::{function, CellId, CellStore, Error};

use crate::init;

struct Dag {
	store: CellStore,
	a: CellId,
	b: CellId,
	c: CellId,
	d: CellId,
	e: CellId,
}

fn dag() -> Dag {
	let mut store = CellStore::new();
	let a = store.create(0_i64);
	let b = store.create(0_i64);
	let c = store.create(0_i64);
	let d = store.create(0_i64);
	let e = store.create(0_i64);

	store.bind(b, function!(|a: i64| a + 1), &[a]).unwrap();
	store.bind(c, function!(|b: i64| b + 1), &[b]).unwrap();
	store
		.bind(d, function!(|a: i64, b: i64| a + b + 1), &[a, b])
		.unwrap();
	store
		.bind(e, function!(|b: i64, c: i64| b + c + 1), &[b, c])
		.unwrap();

	Dag { store, a, b, c, d, e }
}

#[test]
fn direct_dependencies() {
	init();
	let Dag { store, a, b, c, d, e } = dag();

	assert!(store.is_literal(a).unwrap());
	assert!(store.depends_on(b, a).unwrap());
	assert!(store.depends_on(c, b).unwrap());
	assert!(store.depends_on(d, a).unwrap());
	assert!(store.depends_on(d, b).unwrap());
	assert!(store.depends_on(e, b).unwrap());
	assert!(store.depends_on(e, c).unwrap());
}

#[test]
fn indirect_dependencies() {
	let Dag { store, a, b, c, d, e } = dag();

	assert!(store.depends_on(c, a).unwrap());
	assert!(store.depends_on(e, a).unwrap());

	assert!(!store.depends_on(d, c).unwrap());
	assert!(!store.depends_on(a, b).unwrap());
	assert!(!store.depends_on(b, e).unwrap());
	assert!(!store.depends_on(a, a).unwrap());
	assert!(!store.depends_on(e, e).unwrap());
	assert!(!store.depends_on(d, e).unwrap());
}

#[test]
fn values_follow_the_dag() {
	let Dag {
		mut store,
		a,
		b,
		c,
		d,
		e,
	} = dag();

	let values = |store: &CellStore| {
		[a, b, c, d, e]
			.iter()
			.map(|&id| store.get::<i64>(id).unwrap())
			.collect::<Vec<_>>()
	};

	assert_eq!(values(&store), vec![0, 1, 2, 2, 4]);
	store.set_literal(a, 10_i64).unwrap();
	assert_eq!(values(&store), vec![10, 11, 12, 22, 24]);
}

#[test]
fn ancestor_and_descendant_sets() {
	let Dag { store, a, b, c, d, e } = dag();

	assert_eq!(store.ancestors(e).unwrap(), BTreeSet::from([a, b, c]));
	assert_eq!(store.ancestors(d).unwrap(), BTreeSet::from([a, b]));
	assert!(store.ancestors(a).unwrap().is_empty());

	assert_eq!(store.descendants(a).unwrap(), BTreeSet::from([b, c, d, e]));
	assert_eq!(store.descendants(b).unwrap(), BTreeSet::from([c, d, e]));
	assert!(store.descendants(e).unwrap().is_empty());
}

#[test]
fn detached_cells_drop_out_of_ancestry() {
	let Dag {
		mut store,
		a,
		b,
		c,
		e,
		..
	} = dag();

	store.detach(c).unwrap();
	assert!(!store.depends_on(c, a).unwrap());
	assert!(store.depends_on(e, c).unwrap());
	assert!(store.depends_on(e, a).unwrap());
	assert_eq!(store.descendants(b).unwrap().len(), 2);
}

#[test]
fn unknown_handles() {
	let Dag {
		mut store, a, e, ..
	} = dag();

	store.release(e).unwrap();
	assert_eq!(store.depends_on(e, a), Err(Error::UnknownHandle(e)));
	assert_eq!(store.depends_on(a, e), Err(Error::UnknownHandle(e)));
	assert_eq!(store.ancestors(e), Err(Error::UnknownHandle(e)));
}
