//! Build the Mini-0 LL(1) table and print its conflicts.

use mini0::{FirstSets, FollowSets, Ll1Table, grammar, report};

fn main() {
    let g = grammar::mini0().expect("grammar failed");
    let first = FirstSets::compute(&g).expect("FIRST failed");
    let follow = FollowSets::compute(&g, &first).expect("FOLLOW failed");
    let table = Ll1Table::build(&g, &first, &follow);

    println!(
        "{} non-terminals, {} productions",
        g.non_terminals().count(),
        g.production_count()
    );
    println!(
        "FIRST settled after {} sweeps, FOLLOW after {}",
        first.iterations(),
        follow.iterations()
    );
    println!("{} table entries\n", table.len());

    print!("{}", report::conflicts(&table));

    for conflict in table.conflicts() {
        let follow_set = follow
            .of(&conflict.non_terminal)
            .map(|s| s.iter().map(ToString::to_string).collect::<Vec<_>>())
            .unwrap_or_default();
        println!(
            "\nFOLLOW({}) = {{{}}}",
            conflict.non_terminal,
            follow_set.join(", ")
        );
    }
}
