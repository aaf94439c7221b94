//! Static language metadata for chart coloring.
//!
//! Display colors for recognized languages, matching the linguist color
//! registry used by code hosts. Unrecognized names (including the
//! synthesized "Other" slice) fall back to [`FALLBACK_COLOR`].

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Fill color for languages without a registered display color.
pub const FALLBACK_COLOR: &str = "gray";

static LANGUAGE_COLORS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("ActionScript", "#882B0F"),
        ("Ada", "#02f88c"),
        ("Assembly", "#6E4C13"),
        ("Astro", "#ff5a03"),
        ("Batchfile", "#C1F12E"),
        ("C", "#555555"),
        ("C#", "#178600"),
        ("C++", "#f34b7d"),
        ("CMake", "#DA3434"),
        ("COBOL", "#002aff"),
        ("CSS", "#563d7c"),
        ("Clojure", "#db5855"),
        ("CoffeeScript", "#244776"),
        ("Common Lisp", "#3fb68b"),
        ("Crystal", "#000100"),
        ("Cuda", "#3A4E3A"),
        ("D", "#ba595e"),
        ("Dart", "#00B4AB"),
        ("Dockerfile", "#384d54"),
        ("Elixir", "#6e4a7e"),
        ("Elm", "#60B5CC"),
        ("Emacs Lisp", "#c065db"),
        ("Erlang", "#B83998"),
        ("F#", "#b845fc"),
        ("Fortran", "#4d41b1"),
        ("GLSL", "#5686a5"),
        ("Go", "#00ADD8"),
        ("GraphQL", "#e10098"),
        ("Groovy", "#4298b8"),
        ("HCL", "#844FBA"),
        ("HLSL", "#aace60"),
        ("HTML", "#e34c26"),
        ("Haskell", "#5e5086"),
        ("Haxe", "#df7900"),
        ("Java", "#b07219"),
        ("JavaScript", "#f1e05a"),
        ("Julia", "#a270ba"),
        ("Jupyter Notebook", "#DA5B0B"),
        ("Kotlin", "#A97BFF"),
        ("Less", "#1d365d"),
        ("Lua", "#000080"),
        ("MATLAB", "#e16737"),
        ("Makefile", "#427819"),
        ("Markdown", "#083fa1"),
        ("Nim", "#ffc200"),
        ("Nix", "#7e7eff"),
        ("OCaml", "#3be133"),
        ("Objective-C", "#438eff"),
        ("PHP", "#4F5D95"),
        ("PLpgSQL", "#336790"),
        ("Pascal", "#E3F171"),
        ("Perl", "#0298c3"),
        ("PowerShell", "#012456"),
        ("Prolog", "#74283c"),
        ("PureScript", "#1D222D"),
        ("Python", "#3572A5"),
        ("R", "#198CE7"),
        ("Racket", "#3c5caa"),
        ("Raku", "#0000fb"),
        ("Reason", "#ff5847"),
        ("Ruby", "#701516"),
        ("Rust", "#dea584"),
        ("SCSS", "#c6538c"),
        ("SQL", "#e38c00"),
        ("Scala", "#c22d40"),
        ("Scheme", "#1e4aec"),
        ("Shell", "#89e051"),
        ("Smalltalk", "#596706"),
        ("Solidity", "#AA6746"),
        ("Starlark", "#76d275"),
        ("Stylus", "#ff6347"),
        ("Svelte", "#ff3e00"),
        ("Swift", "#F05138"),
        ("SystemVerilog", "#DAE1C2"),
        ("TSX", "#3178c6"),
        ("TeX", "#3D6117"),
        ("Tcl", "#e4cc98"),
        ("TypeScript", "#3178c6"),
        ("V", "#4f87c4"),
        ("VHDL", "#adb2cb"),
        ("Verilog", "#b2b7f8"),
        ("Vim Script", "#199f4b"),
        ("Visual Basic .NET", "#945db7"),
        ("Vue", "#41b883"),
        ("WebAssembly", "#04133b"),
        ("YAML", "#cb171e"),
        ("Zig", "#ec915c"),
    ])
});

/// Look up the registered display color for a language name.
///
/// Lookup is exact and case-sensitive, matching how the stats endpoint
/// reports language names.
pub fn color(name: &str) -> Option<&'static str> {
    LANGUAGE_COLORS.get(name).copied()
}

/// The display color for a language, or [`FALLBACK_COLOR`] when unknown.
pub fn color_or_fallback(name: &str) -> &'static str {
    color(name).unwrap_or(FALLBACK_COLOR)
}
