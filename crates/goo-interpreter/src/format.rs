//! Printf-style rendering with Go's verbs.
//!
//! Supported verbs are `%d %f %e %g %s %v %t` and `%%`, each with an optional
//! `-` flag, width and `.precision`. A boolean result prints as `1`/`0` under
//! `%d` and as `true`/`false` under `%v` and `%t`. Mismatched or missing
//! arguments render inline the way Go does (`%!d(float32=2.5)`,
//! `%!d(MISSING)`, `%!(EXTRA int=3)`) instead of failing.

use crate::output::FormatArg;
use crate::value::{go_exponent, go_float, Value};

#[derive(Debug, Default)]
struct Directive {
    left: bool,
    width: Option<usize>,
    precision: Option<usize>,
}

pub fn render(template: &str, args: &[FormatArg]) -> String {
    let mut out = String::new();
    let mut next = 0usize;
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        let mut d = Directive::default();
        if chars.peek() == Some(&'-') {
            d.left = true;
            chars.next();
        }
        d.width = read_digits(&mut chars);
        if chars.peek() == Some(&'.') {
            chars.next();
            d.precision = Some(read_digits(&mut chars).unwrap_or(0));
        }
        match chars.next() {
            None => out.push_str("%!(NOVERB)"),
            Some('%') => out.push('%'),
            Some(verb) => match args.get(next) {
                Some(arg) => {
                    next += 1;
                    let text = format_arg(verb, &d, arg);
                    out.push_str(&pad(text, &d));
                }
                None => out.push_str(&format!("%!{}(MISSING)", verb)),
            },
        }
    }
    if next < args.len() {
        let extra: Vec<String> = args[next..]
            .iter()
            .map(|a| format!("{}={}", a.type_name(), plain(a)))
            .collect();
        out.push_str(&format!("%!(EXTRA {})", extra.join(", ")));
    }
    out
}

/// Template for `fmt.Println`: every operand separated by a space, then a newline.
pub fn println_template(count: usize) -> String {
    let mut t = vec!["%v"; count].join(" ");
    t.push('\n');
    t
}

/// Template for `fmt.Print`: a space only between two operands that are not strings.
pub fn print_template(args: &[FormatArg]) -> String {
    let mut t = String::new();
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            let prev_text = matches!(args[i - 1], FormatArg::Text(_));
            let this_text = matches!(arg, FormatArg::Text(_));
            if !prev_text && !this_text {
                t.push(' ');
            }
        }
        t.push_str("%v");
    }
    t
}

fn read_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Option<usize> {
    let mut n: Option<usize> = None;
    while let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
        n = Some(n.unwrap_or(0).saturating_mul(10).saturating_add(d as usize));
        chars.next();
    }
    n
}

fn pad(text: String, d: &Directive) -> String {
    let width = d.width.unwrap_or(0);
    let len = text.chars().count();
    if len >= width {
        return text;
    }
    let fill = " ".repeat(width - len);
    if d.left {
        text + &fill
    } else {
        fill + &text
    }
}

fn plain(arg: &FormatArg) -> String {
    match arg {
        FormatArg::Text(s) => s.clone(),
        FormatArg::Value(v) => v.to_string(),
    }
}

fn format_arg(verb: char, d: &Directive, arg: &FormatArg) -> String {
    match (verb, arg) {
        ('v' | 's', FormatArg::Text(s)) => s.clone(),
        (_, FormatArg::Value(v)) => match format_value(verb, d, v) {
            Some(text) => text,
            None => bad_verb(verb, arg),
        },
        _ => bad_verb(verb, arg),
    }
}

fn format_value(verb: char, d: &Directive, value: &Value) -> Option<String> {
    let text = match (verb, value) {
        ('v', Value::Float(x)) | ('g', Value::Float(x)) => go_float(*x),
        ('v', Value::Array(a)) | ('d' | 'f' | 'e' | 'g', Value::Array(a)) => {
            let mut parts = Vec::new();
            for item in a.values() {
                parts.push(format_value(verb, d, &item)?);
            }
            format!("[{}]", parts.join(" "))
        }
        ('v', v) => v.to_string(),
        ('d', Value::Int(n)) => n.to_string(),
        ('d', Value::Bool(b)) => i32::from(*b).to_string(),
        ('t', Value::Bool(b)) => b.to_string(),
        ('f', Value::Float(x)) => format!("{:.*}", d.precision.unwrap_or(6), *x as f64),
        ('e', Value::Float(x)) => go_scientific(*x as f64, d.precision.unwrap_or(6)),
        _ => return None,
    };
    Some(text)
}

fn go_scientific(x: f64, precision: usize) -> String {
    let sci = format!("{:.*e}", precision, x);
    match sci.split_once('e') {
        Some((mantissa, exp)) => {
            format!("{}{}", mantissa, go_exponent(exp.parse::<i32>().unwrap_or(0)))
        }
        None => sci,
    }
}

fn bad_verb(verb: char, arg: &FormatArg) -> String {
    format!("%!{}({}={})", verb, arg.type_name(), plain(arg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::ArrayRef;
    use goo_syntax::ast::Type;

    fn v(value: Value) -> FormatArg {
        FormatArg::Value(value)
    }

    #[test]
    fn test_basic_verbs() {
        assert_eq!(render("%d|%v|%t", &[v(Value::Int(7)), v(Value::Float(2.5)), v(Value::Bool(true))]), "7|2.5|true");
        assert_eq!(render("%f %e", &[v(Value::Float(1.5)), v(Value::Float(1234.5))]), "1.500000 1.234500e+03");
        assert_eq!(render("%.2f%%", &[v(Value::Float(99.5))]), "99.50%");
        assert_eq!(render("%s!", &[FormatArg::Text("hi".into())]), "hi!");
    }

    #[test]
    fn test_bool_encodings() {
        assert_eq!(render("%d %d", &[v(Value::Bool(true)), v(Value::Bool(false))]), "1 0");
        assert_eq!(render("%v", &[v(Value::Bool(false))]), "false");
    }

    #[test]
    fn test_width_and_alignment() {
        assert_eq!(render("[%4d]", &[v(Value::Int(42))]), "[  42]");
        assert_eq!(render("[%-4d]", &[v(Value::Int(42))]), "[42  ]");
    }

    #[test]
    fn test_argument_errors() {
        assert_eq!(render("%d", &[v(Value::Float(2.5))]), "%!d(float32=2.5)");
        assert_eq!(render("%d %d", &[v(Value::Int(1))]), "1 %!d(MISSING)");
        assert_eq!(render("x", &[v(Value::Int(3))]), "x%!(EXTRA int=3)");
    }

    #[test]
    fn test_arrays() {
        let arr = ArrayRef::new(3, Type::Int);
        arr.set(1, Value::Int(4)).unwrap();
        assert_eq!(render("%v", &[v(Value::Array(arr.clone()))]), "[0 4 0]");
        assert_eq!(render("%d", &[v(Value::Array(arr))]), "[0 4 0]");
    }

    #[test]
    fn test_print_templates() {
        assert_eq!(println_template(3), "%v %v %v\n");
        assert_eq!(println_template(0), "\n");
        let args = [
            FormatArg::Text("a".into()),
            v(Value::Int(1)),
            v(Value::Int(2)),
            FormatArg::Text("b".into()),
        ];
        assert_eq!(print_template(&args), "%v%v %v%v");
        assert_eq!(render(&print_template(&args), &args), "a1 2b");
    }
}
