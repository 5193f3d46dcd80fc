//! Scan and parse a few Mini-0 programs and show their diagnostics.

fn main() {
    let programs = [
        (
            "well formed",
            "fun main() : int\n\tx : int\n\tx = 10\n\treturn x\nend\n",
        ),
        ("unclosed if", "fun f()\n\tif true\n\t\treturn\nend\n"),
        ("stray character", "fun f()\n\tx = 5 @ 2\nend\n"),
    ];

    for (label, source) in programs {
        println!("== {label}");
        let lexed = mini0::tokenize(source);
        println!("  tokens: {}", lexed.tokens.len());
        for err in &lexed.errors {
            println!("  {err}");
            println!("    kind: {:?}", err.kind);
        }

        let result = mini0::parse(&lexed.tokens);
        if result.accepted {
            println!("  accepted");
        }
        for err in &result.diagnostics {
            println!("  {err}");
            println!("    at {}", err.span);
        }

        match mini0::check_str(source) {
            Ok(_) => println!("  pipeline: ok"),
            Err(mini0::Error::Lex(errors)) => {
                println!("  pipeline: stopped after {} lexical error(s)", errors.len());
            }
            Err(e) => println!("  pipeline: {e}"),
        }
        println!();
    }
}
