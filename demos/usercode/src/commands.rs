use fire_core::commands;

/// Sum and difference of two integers.
pub fn add(a: i64, b: i64) -> (i64, i64) {
    (a + b, a - b)
}

pub fn scale(value: f64, factor: f64) -> f64 {
    value * factor
}

/// A method set exposed with `#[commands]`.
#[derive(Debug, Default)]
pub struct Calculator {
    pub name: String,
}

#[commands]
impl Calculator {
    pub fn new(name: &str) -> Self {
        Self { name: name.to_owned() }
    }

    /// Add is a method for Add.
    pub fn add(&self, a: i64, b: i64) -> i64 {
        a + b
    }

    /// Minus is a method for Minus.
    pub fn minus(&self, a: i64, b: i64) -> i64 {
        a - b
    }

    pub fn divmod(&self, a: u64, b: u64) -> (u64, u64) {
        if b == 0 {
            return (0, 0);
        }
        (a / b, a % b)
    }

    /// Upper-cases its argument.
    pub fn shout(&self, s: &str) -> String {
        s.to_uppercase()
    }

    /// Prints a greeting.
    pub fn hello_world(&self) {
        println!("Hello, {}!", self.name);
    }

    pub fn print_name(&self) -> &str {
        &self.name
    }

    pub fn is_even(&self, n: i64) -> bool {
        n % 2 == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fire_core::{Config, Fire, Introspectable, Value};

    #[test]
    fn test_calculator_exposes_shared_methods() {
        let calc = Calculator::new("calc");
        let names: Vec<String> = calc.signatures().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["add", "minus", "divmod", "shout", "hello_world", "print_name", "is_even"]);
    }

    #[test]
    fn test_calculator_commands() {
        let calc = Calculator::new("calc");
        let mut out = Vec::new();
        let values = Fire::new(&calc)
            .config(Config::default())
            .output(&mut out)
            .run(&["calc", "divmod", "17", "5"])
            .unwrap();
        assert_eq!(values, vec![Value::Uint(3), Value::Uint(2)]);
        assert_eq!(String::from_utf8(out).unwrap(), "3 2\n");
    }

    #[test]
    fn test_calculator_borrowed_return() {
        let calc = Calculator::new("calc");
        let mut out = Vec::new();
        let values = Fire::new(&calc).output(&mut out).run(&["calc", "print-name"]).unwrap();
        assert_eq!(values, vec![Value::Str("calc".into())]);
    }
}
