//! Queries run end to end against libclang.
//!
//! Every test writes a small fixture to a temporary directory and calls an
//! entry point the way the editor does. Tests return early when libclang
//! cannot be loaded.
//!
//! - Standard run: `cargo test --test query_test`
//! - With debug output: `CLANG_VIM_LOG=clang_vim=debug cargo test --test query_test`
//! - Point at a specific libclang: `LIBCLANG_PATH=/usr/lib/llvm-17/lib cargo test`

mod common;

use clang_vim::vim::ENTRY_POINTS;
use clang_vim::vim::registry::lookup;
use common::{FLAGS, TestWorkspace, libclang_available};

fn call(name: &str, input: &str) -> String {
    lookup(name)
        .unwrap_or_else(|| panic!("unknown entry point {name}"))
        .call(input)
}

#[test]
fn test_version() {
    if !libclang_available() {
        return;
    }
    let version = call("vim_clang_version", "");
    assert!(version.contains("clang version"), "got {version}");
}

#[test]
fn test_function_extent() {
    if !libclang_available() {
        return;
    }
    let ws = TestWorkspace::new(
        r"
//- a.cpp
class Foo { void b$0ar(); };
",
    );

    let extent = call(
        "vim_clang_get_function_extent_at_specific_location",
        &ws.cursor_args(),
    );
    let file = ws.apath("a.cpp");
    assert!(
        extent.starts_with(&format!(
            "{{'start':{{'line':1,'column':13,'offset':12,'file':'{file}',}},'end':{{'line':1,"
        )),
        "got {extent}"
    );

    let class = call(
        "vim_clang_get_class_extent_at_specific_location",
        &ws.cursor_args(),
    );
    assert!(
        class.starts_with("{'start':{'line':1,'column':1,'offset':0,"),
        "got {class}"
    );
}

#[test]
fn test_extent_without_enclosing_node() {
    if !libclang_available() {
        return;
    }
    let ws = TestWorkspace::new(
        r"
//- a.cpp
int glo$0bal = 1;
",
    );

    let extent = call(
        "vim_clang_get_namespace_extent_at_specific_location",
        &ws.cursor_args(),
    );
    assert_eq!(extent, "{}");
}

#[test]
fn test_all_extents_end_with_namespace() {
    if !libclang_available() {
        return;
    }
    let ws = TestWorkspace::new(
        r"
//- a.cpp
namespace ns {
void f() { int x = 1 + $02; }
}
",
    );

    let extents = call("vim_clang_get_all_extents_at", &ws.cursor_args());
    assert!(extents.starts_with("[{'start':"), "got {extents}");
    assert!(extents.ends_with("},]"), "got {extents}");
    // The namespace spans the whole file.
    assert!(
        extents.contains("{'start':{'line':1,'column':1,'offset':0,"),
        "got {extents}"
    );
}

#[test]
fn test_extract_current_file_skips_headers() {
    if !libclang_available() {
        return;
    }
    let ws = TestWorkspace::new(
        r#"
//- main.cpp
#include "a.h"
int main_var;
//- a.h
int header_var;
"#,
    );

    let current = call(
        "vim_clang_extract_declarations_current_file",
        &ws.file_args("main.cpp"),
    );
    assert!(current.starts_with("{'root':["), "got {current}");
    assert!(current.contains("'spell':'main_var'"), "got {current}");
    assert!(!current.contains("'spell':'header_var'"), "got {current}");

    let all = call("vim_clang_extract_declarations", &ws.file_args("main.cpp"));
    assert!(all.contains("'spell':'header_var'"), "got {all}");
    assert!(all.contains("'spell':'main_var'"), "got {all}");
}

#[test]
fn test_extract_non_system_headers_skips_system_includes() {
    if !libclang_available() {
        return;
    }
    let ws = TestWorkspace::new(
        r#"
//- main.cpp
#include <lib.h>
#include "user.h"
int main_var;
//- user.h
int user_var;
//- sys/lib.h
int system_var;
"#,
    );
    let input = format!("{}:{FLAGS} -isystem {}", ws.apath("main.cpp"), ws.apath("sys"));

    let non_system = call("vim_clang_extract_declarations_non_system_headers", &input);
    assert!(non_system.starts_with("{'root':["), "got {non_system}");
    assert!(non_system.contains("'spell':'main_var'"), "got {non_system}");
    assert!(non_system.contains("'spell':'user_var'"), "got {non_system}");
    assert!(!non_system.contains("'spell':'system_var'"), "got {non_system}");

    let all = call("vim_clang_extract_declarations", &input);
    assert!(all.contains("'spell':'system_var'"), "got {all}");
    assert!(all.contains("'spell':'user_var'"), "got {all}");
    assert!(all.contains("'spell':'main_var'"), "got {all}");
}

#[test]
fn test_extract_records_children() {
    if !libclang_available() {
        return;
    }
    let ws = TestWorkspace::new(
        r"
//- a.cpp
struct S { virtual void v() = 0; static void s(); };
",
    );

    let pure = call(
        "vim_clang_extract_pure_virtual_member_functions_current_file",
        &ws.file_args("a.cpp"),
    );
    assert!(pure.contains("'spell':'v'"), "got {pure}");
    assert!(pure.contains("'is_pure_virtual_member_function':1,"), "got {pure}");
    assert!(!pure.contains("'spell':'s'"), "got {pure}");

    let statics = call(
        "vim_clang_extract_static_member_functions_current_file",
        &ws.file_args("a.cpp"),
    );
    assert!(statics.contains("'spell':'s'"), "got {statics}");
    assert!(statics.contains("'children':[]},"), "got {statics}");
}

#[test]
fn test_missing_file_gives_sentinels() {
    if !libclang_available() {
        return;
    }
    let ws = TestWorkspace::new(
        r"
//- a.cpp
int x;
",
    );
    let missing = ws.apath("missing.cpp");

    assert_eq!(
        call(
            "vim_clang_get_location_information",
            &format!("{missing}:{FLAGS}:1:1")
        ),
        "{}"
    );
    assert_eq!(call("vim_clang_tokens", &format!("{missing}:{FLAGS}")), "[]");
    assert_eq!(
        call("vim_clang_get_all_extents_at", &format!("{missing}:{FLAGS}:1:1")),
        "[]"
    );
    assert_eq!(
        call("vim_clang_get_completion_at", &format!("{missing}:{FLAGS}:1:1")),
        "[]"
    );
    assert_eq!(
        call("vim_clang_get_diagnostics", &format!("{missing}:{FLAGS}")),
        "[]"
    );

    let extractions: Vec<_> = ENTRY_POINTS
        .iter()
        .filter(|entry| entry.name.starts_with("vim_clang_extract_"))
        .collect();
    assert_eq!(extractions.len(), 36);
    for entry in extractions {
        assert_eq!(
            entry.call(&format!("{missing}:{FLAGS}")),
            "{}",
            "{} on a missing file",
            entry.name
        );
    }
}

#[test]
fn test_unsaved_buffer_keeps_logical_name() {
    if !libclang_available() {
        return;
    }
    let ws = TestWorkspace::new(
        r"
//- a.cpp
int on_disk;
//- b.cpp
int in_buffer;
",
    );

    let input = format!("{}#{}:{FLAGS}:1:5", ws.apath("a.cpp"), ws.apath("b.cpp"));
    let info = call("vim_clang_get_location_information", &input);
    assert!(info.contains("'spell':'in_buffer'"), "got {info}");
    assert!(
        info.contains(&format!("'file':'{}'", ws.apath("a.cpp"))),
        "got {info}"
    );
    assert!(!info.contains("b.cpp"), "got {info}");
}

#[test]
fn test_location_information() {
    if !libclang_available() {
        return;
    }
    let ws = TestWorkspace::new(
        r"
//- a.cpp
namespace ns { int va$0lue = 0; }
",
    );

    let info = call("vim_clang_get_location_information", &ws.cursor_args());
    assert!(info.starts_with("{'spell':'value','type':'int',"), "got {info}");
    assert!(info.contains("'semantic_parent':'ns',"), "got {info}");
    assert!(info.contains("'kind':'VarDecl',"), "got {info}");
    assert!(info.contains("'kind_type':'Declaration',"), "got {info}");
    assert!(info.contains("'is_definition':1,"), "got {info}");
    assert!(info.contains("'is_POD_type':1,"), "got {info}");
}

#[test]
fn test_tokens() {
    if !libclang_available() {
        return;
    }
    let ws = TestWorkspace::new(
        r"
//- a.cpp
int x;
",
    );

    let tokens = call("vim_clang_tokens", &ws.file_args("a.cpp"));
    let file = ws.apath("a.cpp");
    assert!(
        tokens.starts_with(&format!(
            "[{{'spell':'int','kind':'keyword','file':'{file}','line':1,'column':1,'offset':0}},"
        )),
        "got {tokens}"
    );
    assert!(
        tokens.contains("{'spell':'x','kind':'identifier',"),
        "got {tokens}"
    );
    assert!(tokens.ends_with("},]"), "got {tokens}");
}

#[test]
fn test_definition_and_result_type() {
    if !libclang_available() {
        return;
    }
    let ws = TestWorkspace::new(
        r"
//- a.cpp
typedef int Number;
int twice(Number n) { return n * 2; }
int y = tw$0ice(1);
",
    );

    let definition = call("vim_clang_get_definition_at", &ws.cursor_args());
    assert!(definition.contains("'spell':'twice'"), "got {definition}");
    assert!(definition.contains("'line':2,"), "got {definition}");

    let result = call("vim_clang_get_result_type_at", &ws.cursor_args());
    assert!(result.starts_with("{'type':'int',"), "got {result}");
}

#[test]
fn test_deduce_auto_variable() {
    if !libclang_available() {
        return;
    }
    let ws = TestWorkspace::new(
        r"
//- a.cpp
double make() { return 1.0; }
void f() { auto va$0lue = make(); }
",
    );

    let deduced = call("vim_clang_deduce_var_decl_at", &ws.cursor_args());
    assert!(deduced.starts_with("{'type':'double',"), "got {deduced}");
    assert!(deduced.contains("'canonical':{'type':'double',"), "got {deduced}");
}

#[test]
fn test_deduce_auto_return_type() {
    if !libclang_available() {
        return;
    }
    let ws = TestWorkspace::new(
        r"
//- a.cpp
auto ma$0ke() { return 1.5; }
",
    );

    let deduced = call("vim_clang_deduce_func_decl_at", &ws.cursor_args());
    assert!(deduced.starts_with("{'type':'double',"), "got {deduced}");
    assert!(deduced.contains("'canonical':{'type':'double',"), "got {deduced}");
}

#[test]
fn test_deduce_func_or_var_decl() {
    if !libclang_available() {
        return;
    }
    let ws = TestWorkspace::new(
        r"
//- a.cpp
int ha$0lf(int x) { return x / 2; }
",
    );
    let function = call("vim_clang_deduce_func_or_var_decl_at", &ws.cursor_args());
    assert!(function.starts_with("{'type':'int',"), "got {function}");

    let ws = TestWorkspace::new(
        r"
//- a.cpp
auto coun$0t = 2L;
",
    );
    let variable = call("vim_clang_deduce_func_or_var_decl_at", &ws.cursor_args());
    assert!(variable.starts_with("{'type':'long',"), "got {variable}");
}

#[test]
fn test_type_with_deduction() {
    if !libclang_available() {
        return;
    }
    let ws = TestWorkspace::new(
        r"
//- a.cpp
double make();
void f() { auto res$0ult = make(); }
",
    );

    let deduced = call("vim_clang_get_type_with_deduction_at", &ws.cursor_args());
    assert!(deduced.starts_with("{'type':'double',"), "got {deduced}");
}

#[test]
fn test_referenced_and_declaration() {
    if !libclang_available() {
        return;
    }
    let ws = TestWorkspace::new(
        r"
//- a.cpp
int value = 1;
int copy = val$0ue;
",
    );
    let referenced = call("vim_clang_get_referenced_at", &ws.cursor_args());
    assert!(referenced.starts_with("{'spell':'value',"), "got {referenced}");
    assert!(referenced.contains("'line':1,"), "got {referenced}");

    let ws = TestWorkspace::new(
        r"
//- a.cpp
void f();
void $0f() {}
",
    );
    let declaration = call("vim_clang_get_declaration_at", &ws.cursor_args());
    assert!(declaration.starts_with("{'spell':'f',"), "got {declaration}");
    assert!(declaration.contains("'line':1,"), "got {declaration}");
    assert!(!declaration.contains("'is_definition':1,"), "got {declaration}");
}

#[test]
fn test_type_relations() {
    if !libclang_available() {
        return;
    }
    let ws = TestWorkspace::new(
        r"
//- a.cpp
int *p$0tr = 0;
",
    );
    let pointee = call("vim_clang_get_pointee_type_at", &ws.cursor_args());
    assert!(pointee.starts_with("{'type':'int',"), "got {pointee}");

    let ws = TestWorkspace::new(
        r"
//- a.cpp
typedef unsigned long Size;
Size s$0ize = 0;
",
    );
    let canonical = call("vim_clang_get_canonical_type_at", &ws.cursor_args());
    assert!(canonical.starts_with("{'type':'unsigned long',"), "got {canonical}");

    let ws = TestWorkspace::new(
        r"
//- a.cpp
struct S { int m; };
int S::*mem$0ber = &S::m;
",
    );
    let class = call(
        "vim_clang_get_class_type_of_member_pointer_at",
        &ws.cursor_args(),
    );
    assert!(class.starts_with("{'type':'S',"), "got {class}");

    // A plain int has no pointee.
    let ws = TestWorkspace::new(
        r"
//- a.cpp
int pla$0in = 0;
",
    );
    assert_eq!(call("vim_clang_get_pointee_type_at", &ws.cursor_args()), "{}");
}

#[test]
fn test_current_function_qualified_name() {
    if !libclang_available() {
        return;
    }
    let ws = TestWorkspace::new(
        r"
//- a.cpp
namespace ns {
struct C {
  void foo() { int $0x = 0; }
};
}
",
    );

    let name = call("vim_clang_get_current_function_at", &ws.cursor_args());
    assert_eq!(name, "{'name':'ns::C::foo'}");
}

#[test]
fn test_full_name_of_referenced_symbol() {
    if !libclang_available() {
        return;
    }
    let ws = TestWorkspace::new(
        r"
//- a.cpp
namespace E { void foo(); }
void g() { E::fo$0o(); }
",
    );

    assert_eq!(
        call("vim_clang_get_full_name_at", &ws.cursor_args()),
        "{'name':'E::foo'}"
    );
}

#[test]
fn test_current_function_outside_function() {
    if !libclang_available() {
        return;
    }
    let ws = TestWorkspace::new(
        r"
//- a.cpp
int glo$0bal;
",
    );

    assert_eq!(
        call("vim_clang_get_current_function_at", &ws.cursor_args()),
        "{}"
    );
}

#[test]
fn test_comment_of_referenced_member() {
    if !libclang_available() {
        return;
    }
    let ws = TestWorkspace::new(
        r"
//- a.cpp
struct E {
  /// This is foo.
  void foo();
};
void g(E e) { e.fo$0o(); }
",
    );

    assert_eq!(
        call("vim_clang_get_comment_at", &ws.cursor_args()),
        "{'brief':'This is foo.'}"
    );
}

#[test]
fn test_include_at_directive() {
    if !libclang_available() {
        return;
    }
    let ws = TestWorkspace::new(
        r#"
//- main.cpp
#$0include "inc.hpp"
int x = included;
//- inc.hpp
int included = 1;
"#,
    );

    let include = call("vim_clang_get_include_at", &ws.cursor_args());
    assert!(include.starts_with("{'file':'"), "got {include}");
    assert!(include.ends_with("inc.hpp'}"), "got {include}");
}

#[test]
fn test_deduced_declaration() {
    if !libclang_available() {
        return;
    }
    let ws = TestWorkspace::new(
        r"
//- a.cpp
int value = 1;
int copy = val$0ue;
",
    );

    assert_eq!(
        call("vim_clang_get_deduced_declaration_at", &ws.cursor_args()),
        format!("{{'file':'{}','line':'1','col':'5',}}", ws.apath("a.cpp"))
    );
}

#[test]
fn test_completion() {
    if !libclang_available() {
        return;
    }
    let ws = TestWorkspace::new(
        r"
//- a.cpp
struct S { int member; int other; };
void f() { S s; s.$0 }
",
    );

    let candidates = call("vim_clang_get_completion_at", &ws.cursor_args());
    assert!(candidates.starts_with('['), "got {candidates}");
    assert!(candidates.contains("'member'"), "got {candidates}");
    assert!(candidates.contains("'other'"), "got {candidates}");
}

#[test]
fn test_diagnostics() {
    if !libclang_available() {
        return;
    }
    let ws = TestWorkspace::new(
        r"
//- a.cpp
int x = ;
",
    );

    let diagnostics = call("vim_clang_get_diagnostics", &ws.file_args("a.cpp"));
    assert!(
        diagnostics.starts_with("[{'severity': 'error', 'line':1,"),
        "got {diagnostics}"
    );
    assert!(diagnostics.ends_with("}, ]"), "got {diagnostics}");
}

#[test]
fn test_completion_uses_unsaved_buffer() {
    if !libclang_available() {
        return;
    }
    let ws = TestWorkspace::new(
        r"
//- a.cpp
int on_disk;
//- b.cpp
struct S { int in_buffer; };
void f() { S s; s.$0 }
",
    );
    let (_, line, col) = ws.fixture.cursor.clone().unwrap();

    let input = format!("{}#{}:{FLAGS}:{line}:{col}", ws.apath("a.cpp"), ws.apath("b.cpp"));
    let candidates = call("vim_clang_get_completion_at", &input);
    assert!(candidates.contains("'in_buffer'"), "got {candidates}");
}

#[test]
fn test_diagnostics_use_unsaved_buffer() {
    if !libclang_available() {
        return;
    }
    let ws = TestWorkspace::new(
        r"
//- a.cpp
int x = 1;
//- b.cpp
int x = ;
",
    );

    let input = format!("{}#{}:{FLAGS}", ws.apath("a.cpp"), ws.apath("b.cpp"));
    let diagnostics = call("vim_clang_get_diagnostics", &input);
    assert!(
        diagnostics.starts_with("[{'severity': 'error', 'line':1,"),
        "got {diagnostics}"
    );
    assert!(
        diagnostics.contains(&format!("'file':'{}',", ws.apath("a.cpp"))),
        "got {diagnostics}"
    );
    assert!(!diagnostics.contains("b.cpp"), "got {diagnostics}");
}

#[test]
fn test_clean_file_has_no_diagnostics() {
    if !libclang_available() {
        return;
    }
    let ws = TestWorkspace::new(
        r"
//- a.cpp
int x = 1;
",
    );

    assert_eq!(
        call("vim_clang_get_diagnostics", &ws.file_args("a.cpp")),
        "[]"
    );
}

#[test]
fn test_compile_commands_from_database() {
    if !libclang_available() {
        return;
    }
    let ws = TestWorkspace::new(
        r"
//- src/a.cpp
int x;
",
    );
    let file = ws.apath("src/a.cpp");
    let database = serde_json::json!([{
        "directory": ws.canonical_root(),
        "command": format!("clang++ -DFROM_DATABASE -c {file}"),
        "file": file,
    }]);
    std::fs::write(
        ws.canonical_root().join("compile_commands.json"),
        database.to_string(),
    )
    .unwrap();

    let commands = call("vim_clang_get_compile_commands", &format!("{file}:"));
    assert!(commands.starts_with("{'commands':'"), "got {commands}");
    assert!(commands.contains("-DFROM_DATABASE"), "got {commands}");
    assert!(!commands.contains("a.cpp"), "got {commands}");
}

#[test]
fn test_compile_commands_without_database() {
    if !libclang_available() {
        return;
    }
    let ws = TestWorkspace::new(
        r"
//- a.cpp
int x;
",
    );

    let commands = call(
        "vim_clang_get_compile_commands",
        &format!("{}:", ws.apath("a.cpp")),
    );
    let defaults = clang_vim::Config::global().default_flags.join(" ");
    assert_eq!(commands, format!("{{'commands':'{defaults}'}}"));
}
