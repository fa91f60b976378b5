//! Property tests over the whole rewrite path.

use proptest::prelude::*;

use crate::common::*;

fn arb_text() -> impl Strategy<Value = String> {
    "[a-z./:]{0,24}"
}

fn arb_tree() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        arb_text().prop_map(Value::from),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop::collection::vec((any::<i64>().prop_map(Value::Int), inner), 0..4)
            .prop_map(Value::Array)
    })
}

fn leaves(value: &Value, out: &mut Vec<Vec<u8>>) {
    match value {
        Value::String(bytes) => out.push(bytes.clone()),
        Value::Array(pairs) => pairs.iter().for_each(|(_, v)| leaves(v, out)),
        _ => {}
    }
}

proptest! {
    #[test]
    fn rewritten_trees_decode_with_every_leaf_replaced(tree in arb_tree()) {
        let rules = rules(&[("old.test", "new.example.org")]);
        let text = String::from_utf8(encode(&tree)).unwrap();
        let (out, issues) = rewrite(&rules, &text);
        prop_assert!(issues.is_empty());

        let decoded = decode(out.as_bytes()).unwrap();
        let mut before = Vec::new();
        let mut after = Vec::new();
        leaves(&tree, &mut before);
        leaves(&decoded, &mut after);
        prop_assert_eq!(before.len(), after.len());
        for (b, a) in before.iter().zip(&after) {
            let expected = rules.apply(b).unwrap_or_else(|| b.clone());
            prop_assert_eq!(a, &expected);
        }
    }

    #[test]
    fn second_pass_is_a_no_op(tree in arb_tree()) {
        let rules = rules(&[("old.test", "new.example.org")]);
        let text = String::from_utf8(encode(&tree)).unwrap();
        let (once, _) = rewrite(&rules, &text);
        let (twice, _) = rewrite(&rules, &once);
        prop_assert_eq!(once, twice);
    }
}
