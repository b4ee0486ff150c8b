// ---------------------------------------------------------------------------
// Test scaffold synthesis: payload struct, scenario table, runner loop
// ---------------------------------------------------------------------------
//
// Every block is a pure function of the declaration text, so regenerating an
// unchanged function yields byte-identical output.

use crate::abbrev::{abbreviate, number_duplicates, AbbreviationTable};
use crate::signature::decompose;
use crate::types::{Callable, Slot};

/// Positional name of the `i`-th result in the generated call and assertion.
fn result_var(i: usize) -> String {
    format!("res{i}")
}

/// Struct field type for a parameter; variadic `...T` is stored as `[]T`.
fn field_type(slot: &Slot) -> String {
    match slot.type_text.strip_prefix("...") {
        Some(elem) => format!("[]{elem}"),
        None => slot.type_text.clone(),
    }
}

/// Go test function name. Unexported functions keep their case behind an underscore
/// so `add` and `Add` in one package do not clash.
pub fn test_name(func_name: &str) -> String {
    if func_name.starts_with(|c: char| c.is_lowercase()) {
        format!("Test_{func_name}")
    } else {
        format!("Test{func_name}")
    }
}

/// `type payload struct { … }` with one abbreviated field per parameter.
pub fn payload_block(params: &[Slot]) -> String {
    let mut table = AbbreviationTable::new();
    let mut out = String::from("\ttype payload struct {\n");
    for slot in params {
        let name = table.field_name(&slot.type_text);
        out.push_str(&format!("\t\t{name} {}\n", field_type(slot)));
    }
    out.push_str("\t}\n");
    out
}

/// The empty scenario table whose assertion callback takes one argument per result.
pub fn scenario_block(results: &[Slot]) -> String {
    let mut assert_params = vec!["t *testing.T".to_string()];
    assert_params.extend(results.iter().map(|r| format!("{} {}", result_var(r.index), r.type_text)));

    format!(
        "\ttests := []struct {{\n\
         \t\tscenario string\n\
         \t\tpayload  payload\n\
         \t\tassert   func({})\n\
         \t}}{{\n\
         \t\t// Put your scenarios here\n\
         \t}}\n",
        assert_params.join(", ")
    )
}

/// The `for _, tt := range tests` loop calling `func_name` and handing results to `assert`.
pub fn runner_block(func_name: &str, params: &[Slot], results: &[Slot]) -> String {
    let fields: Vec<String> = params.iter().map(|p| abbreviate(&p.type_text)).collect();
    let args: Vec<String> = number_duplicates(&fields)
        .into_iter()
        .zip(params)
        .map(|(field, p)| {
            let spread = if p.is_variadic() { "..." } else { "" };
            format!("tt.payload.{field}{spread}")
        })
        .collect();

    let vars: Vec<String> = results.iter().map(|r| result_var(r.index)).collect();
    let call = format!("{func_name}({})", args.join(", "));
    let call_stmt = if vars.is_empty() { call } else { format!("{} := {call}", vars.join(", ")) };

    let mut assert_args = vec!["t".to_string()];
    assert_args.extend(vars);

    format!(
        "\tfor _, tt := range tests {{\n\
         \t\tt.Run(tt.scenario, func(t *testing.T) {{\n\
         \t\t\t{call_stmt}\n\
         \t\t\ttt.assert({})\n\
         \t\t}})\n\
         \t}}\n",
        assert_args.join(", ")
    )
}

/// Full scaffold for one free function: `func TestX(t *testing.T) { … }`.
pub fn synthesize(func: &Callable) -> String {
    let params = decompose(&func.parameters);
    let results = decompose(&func.results);

    let mut out = format!("func {}(t *testing.T) {{\n", test_name(&func.name));
    out.push_str(&payload_block(&params));
    out.push_str(&scenario_block(&results));
    out.push_str(&runner_block(&func.name, &params, &results));
    out.push_str("}\n");
    out
}
