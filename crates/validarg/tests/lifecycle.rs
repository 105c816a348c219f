use std::sync::Arc;
use std::thread;
use validarg::{AttrValue, HasLifeline, Lifeline, SlotTable, TableConfig, ValidArg, ValueKind};

struct Widget {
    lifeline: Lifeline,
    #[allow(dead_code)]
    payload: Vec<u8>,
}

impl Widget {
    fn new() -> Self {
        Self {
            lifeline: Lifeline::new(),
            payload: vec![0; 64],
        }
    }
}

impl HasLifeline for Widget {
    fn lifeline(&self) -> &Lifeline {
        &self.lifeline
    }
}

fn width() -> ValidArg {
    ValidArg::new("width", ValueKind::Int).lower_bound(1).default(1)
}

#[test]
fn store_size_returns_to_prior_count() {
    let arg = width();
    let survivor = Widget::new();
    arg.assign(&survivor, 5).unwrap();
    let before = arg.stored_count();

    let temp = Widget::new();
    arg.assign(&temp, 9).unwrap();
    assert_eq!(arg.stored_count(), before + 1);

    drop(temp);
    assert_eq!(arg.stored_count(), before);
    assert_eq!(arg.get(&survivor), AttrValue::Int(5));
}

#[test]
fn many_short_lived_instances_do_not_accumulate() {
    let arg = width();
    for n in 1..=1000 {
        let w = Widget::new();
        arg.assign(&w, n).unwrap();
    }
    assert_eq!(arg.stored_count(), 0);
}

#[test]
fn unassigned_instances_never_enter_the_store() {
    let arg = width();
    let w = Widget::new();
    assert_eq!(arg.get(&w), AttrValue::Int(1));
    assert!(arg.assign(&w, 0).is_err());
    assert_eq!(arg.stored_count(), 0);
    assert_eq!(w.lifeline().watcher_count(), 0);
}

#[test]
fn boxed_and_shared_instances_are_supported() {
    let arg = width();
    let boxed = Box::new(Widget::new());
    arg.assign(&boxed, 3).unwrap();
    assert_eq!(arg.get(&*boxed), AttrValue::Int(3));

    let shared = Arc::new(Widget::new());
    let other = Arc::clone(&shared);
    arg.assign(&shared, 4).unwrap();
    assert_eq!(arg.get(&other), AttrValue::Int(4));

    drop(shared);
    assert_eq!(arg.stored_count(), 2);
    drop(other);
    drop(boxed);
    assert_eq!(arg.stored_count(), 0);
}

#[test]
fn instances_dropped_on_other_threads_are_evicted() {
    let arg = Arc::new(width());
    let handles: Vec<_> = (0..8)
        .map(|n| {
            let arg = Arc::clone(&arg);
            thread::spawn(move || {
                for i in 0..100 {
                    let w = Widget::new();
                    arg.assign(&w, n * 100 + i + 1).unwrap();
                    assert_eq!(arg.get(&w), AttrValue::Int(n * 100 + i + 1));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(arg.stored_count(), 0);
}

#[test]
fn instance_moved_to_another_thread_is_evicted_there() {
    let arg = width();
    let w = Widget::new();
    arg.assign(&w, 2).unwrap();
    thread::spawn(move || drop(w)).join().unwrap();
    assert_eq!(arg.stored_count(), 0);
}

#[test]
fn slot_table_evicts_every_slot() {
    let table = SlotTable::new("Widget")
        .bind("width", width())
        .bind(
            "label",
            ValidArg::new("label", ValueKind::Str).upper_bound(8).default(""),
        );
    let w = Widget::new();
    table
        .init(&w, [("width", AttrValue::Int(2)), ("label", "ok".into())])
        .unwrap();
    assert!(table.slots().all(|(_, arg)| arg.stored_count() == 1));

    drop(w);
    assert!(table.slots().all(|(_, arg)| arg.stored_count() == 0));
}

#[test]
fn dropping_the_table_before_instances_is_harmless() {
    let w = Widget::new();
    {
        let table = SlotTable::new("Widget").bind("width", width());
        table.set(&w, "width", Some(7.into())).unwrap();
    }
    drop(w);
}

#[test]
fn rebuilt_tables_do_not_grow_a_long_lived_instance() {
    let config = TableConfig::from_toml_str(
        "name = \"Widget\"\n[[slots]]\nname = \"width\"\nkind = \"int\"\nlower_bound = 1\n",
    )
    .unwrap();
    let w = Widget::new();
    for n in 1..=50 {
        let table = config.build();
        table.set(&w, "width", Some(AttrValue::Int(n))).unwrap();
    }
    assert_eq!(w.lifeline().watcher_count(), 1);
}

#[test]
fn rejected_writes_never_reach_the_store() {
    let arg = width();
    let w = Widget::new();
    assert!(arg.assign(&w, "wide").is_err());
    assert!(arg.assign(&w, 0).is_err());
    assert!(!arg.store().contains(w.lifeline().id()));
    assert_eq!(arg.get(&w), AttrValue::Int(1));

    arg.assign(&w, 4).unwrap();
    drop(w);
    assert_eq!(arg.stored_count(), 0);
}
