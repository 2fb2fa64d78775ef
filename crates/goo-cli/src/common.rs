use owo_colors::OwoColorize;

use goo_interpreter::{ErrorKind, MAX_CALL_DEPTH_VAR};

/// Hints for lex and parse errors, matched on the message text.
pub fn provide_error_suggestions(err_msg: &str) {
    if err_msg.contains("did you mean '&&'") || err_msg.contains("did you mean '||'") {
        eprintln!("{}", "💡 Help: Goo has no bitwise operators.".yellow());
        eprintln!("    {}", "Use && and || to combine conditions".bright_black());
    } else if err_msg.contains("Unsupported package function") {
        eprintln!("{}", "💡 Help: Only fmt.Print, fmt.Println and fmt.Printf are available.".yellow());
        eprintln!("    {}", "Example: fmt.Println(\"k =\", k)".bright_black());
    } else if err_msg.contains("Unknown type") {
        eprintln!("{}", "💡 Help: Goo has types: int, float32 and fixed-size arrays like [10]int".yellow());
    } else if err_msg.contains("Non-name on left side of ':='") {
        eprintln!("{}", "💡 Help: ':=' declares a new variable and needs a plain name on the left.".yellow());
        eprintln!("    {}", "Use '=' to assign to an array element: arr[k] = v".bright_black());
    } else if err_msg.contains("Expected") {
        eprintln!("{}", "💡 Help: Missing required syntax element.".yellow());
        if err_msg.contains("'package'") {
            eprintln!("    {}", "Every file starts with: package main".bright_black());
        } else if err_msg.contains("'}'") || err_msg.contains("'{'") {
            eprintln!("    {}", "Check that braces are balanced and '{' ends the line of an if or func".bright_black());
        } else if err_msg.contains("identifier") {
            eprintln!("    {}", "Expected a variable or function name".bright_black());
        }
    } else if err_msg.contains("Unterminated string") {
        eprintln!("{}", "💡 Help: String is missing closing quote.".yellow());
        eprintln!("    {}", "Make sure every \" has a matching closing \" on the same line".bright_black());
    } else if err_msg.contains("Invalid number") {
        eprintln!("{}", "💡 Help: Number format is not recognized.".yellow());
        eprintln!("    {}", "Use integers like 42 or floats like 2.5 and 1e3".bright_black());
    }
}

/// Hints keyed on the runtime error kind.
pub fn provide_runtime_suggestions(kind: &ErrorKind) {
    match kind {
        ErrorKind::UnboundIdentifier(name) if name == "fmt" => {
            eprintln!("{}", "💡 Help: Add the import before using fmt.".yellow());
            eprintln!("    {}", "Example: import \"fmt\"".bright_black());
        }
        ErrorKind::UnboundIdentifier(name) if name == "main" => {
            eprintln!("{}", "💡 Help: A runnable program needs func main() { ... }".yellow());
        }
        ErrorKind::UnboundIdentifier(_) => {
            eprintln!("{}", "💡 Help: Declare the name before use with var, const or :=.".yellow());
            eprintln!("    {}", "Functions only see their own locals and package-level variables".bright_black());
        }
        ErrorKind::ImmutableTarget(_) => {
            eprintln!("{}", "💡 Help: Only variables and array elements can be assigned.".yellow());
            eprintln!("    {}", "Boolean results cannot be stored; use them directly in if, &&, || or !".bright_black());
        }
        ErrorKind::TypeMismatch(_) => {
            eprintln!("{}", "💡 Help: Make sure the value matches the declared type.".yellow());
            eprintln!("    {}", "Convert explicitly with int(x) or float32(x)".bright_black());
        }
        ErrorKind::IndexOutOfRange { .. } => {
            eprintln!("{}", "💡 Help: Index is outside the valid range.".yellow());
            eprintln!("    {}", "Arrays are 0-indexed: valid indices of [10]int are 0 through 9".bright_black());
        }
        ErrorKind::StackOverflow(_) => {
            eprintln!("{}", "💡 Help: Recursion went too deep. Check the base case.".yellow());
            eprintln!(
                "    {}",
                format!("Raise the limit with --max-depth N or {}", MAX_CALL_DEPTH_VAR).bright_black()
            );
        }
        ErrorKind::MissingReturn(_) => {
            eprintln!("{}", "💡 Help: Every path through a function with a result type must return.".yellow());
        }
        ErrorKind::DivisionByZero => {
            eprintln!("{}", "💡 Help: You cannot divide by zero.".yellow());
            eprintln!("    {}", "Check if the divisor is zero before the operation.".bright_black());
        }
        ErrorKind::ArityMismatch { .. } => {
            eprintln!("{}", "💡 Help: Function called with wrong number of arguments.".yellow());
        }
        ErrorKind::Redeclared(_) => {
            eprintln!("{}", "💡 Help: Pick a new name, or use '=' to assign the existing one.".yellow());
        }
    }
}
