/// Hands out names for compiler-generated values.
///
/// One generator is created per function, so names are unique within a
/// function and two compilations never share a counter.
#[derive(Debug, Default)]
pub struct NameGen {
    var_counter: usize,
}

impl NameGen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn make_temp(&mut self) -> String {
        let name = format!("tmp.{}", self.var_counter);
        self.var_counter += 1;
        name
    }
}
