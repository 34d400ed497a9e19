use burn::data::dataset::Dataset;

use crate::domain::example::Example;

/// The flat list of labeled training examples produced by the corpus
/// loader. Implements Burn's Dataset trait so consumers get indexed
/// random access; the batch generator takes ownership of the list.
#[derive(Debug)]
pub struct ExampleSet {
    examples: Vec<Example>,
}

impl ExampleSet {
    pub fn new(examples: Vec<Example>) -> Self {
        Self { examples }
    }

    pub fn example_count(&self) -> usize {
        self.examples.len()
    }

    pub fn positive_count(&self) -> usize {
        self.examples.iter().filter(|e| e.is_positive()).count()
    }

    pub fn negative_count(&self) -> usize {
        self.examples.len() - self.positive_count()
    }

    pub fn into_examples(self) -> Vec<Example> {
        self.examples
    }
}

impl Dataset<Example> for ExampleSet {
    fn get(&self, index: usize) -> Option<Example> {
        self.examples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.examples.len()
    }
}
