//! The controller hot paths open tracing spans; make sure they behave
//! under an installed subscriber.

use quickpick_list::{ListConfig, ListController, PickEntry, PickItem};

#[test]
fn filter_runs_under_a_subscriber() {
    let subscriber = tracing_subscriber::registry();
    tracing::subscriber::with_default(subscriber, || {
        let mut list = ListController::new(ListConfig::default());
        list.set_items(vec![
            PickEntry::Item(PickItem::new("$(file) alpha", "a".to_owned())),
            PickEntry::Item(PickItem::new("beta", "b".to_owned())),
        ]);
        list.filter("al");
        assert_eq!(list.visible_count(), 1);
        list.filter("");
        assert_eq!(list.visible_count(), 2);
    });
}
