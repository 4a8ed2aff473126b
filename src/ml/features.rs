//! Bag-of-words and one-hot encoding.
//!
//! Vectors produced here are only valid against the vocabulary and label set
//! they were encoded with; see [`crate::vocabulary`].

use ndarray::{Array1, Array2};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::{IntentlyError, Result};
use crate::vocabulary::{Document, LabelSet, Vocabulary};

/// Encode tokens as a binary presence vector of length `V`.
///
/// Position `i` is 1 iff `vocabulary[i]` occurs anywhere in `tokens`;
/// repeated tokens do not count twice and unknown tokens are ignored.
pub fn encode_input<S: AsRef<str>>(tokens: &[S], vocabulary: &Vocabulary) -> Array1<f32> {
    let mut bag = Array1::zeros(vocabulary.len());
    for token in tokens {
        if let Some(idx) = vocabulary.index_of(token.as_ref()) {
            bag[idx] = 1.0;
        }
    }
    bag
}

/// Encode a tag as a one-hot vector of length `C`.
pub fn encode_label(tag: &str, labels: &LabelSet) -> Result<Array1<f32>> {
    let idx = labels
        .index_of(tag)
        .ok_or_else(|| IntentlyError::UnknownLabel(tag.to_string()))?;
    let mut one_hot = Array1::zeros(labels.len());
    one_hot[idx] = 1.0;
    Ok(one_hot)
}

/// One encoded `(bag of words, one-hot label)` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingExample {
    /// Bag-of-words input.
    pub input: Array1<f32>,
    /// One-hot target.
    pub target: Array1<f32>,
}

/// A multiset of training examples sharing one vocabulary and label set.
#[derive(Debug, Clone, Default)]
pub struct TrainingSet {
    examples: Vec<TrainingExample>,
}

impl TrainingSet {
    /// Wrap already encoded examples.
    pub fn new(examples: Vec<TrainingExample>) -> Self {
        TrainingSet { examples }
    }

    /// Encode every document.
    pub fn encode(
        documents: &[Document],
        vocabulary: &Vocabulary,
        labels: &LabelSet,
    ) -> Result<Self> {
        let examples = documents
            .iter()
            .map(|doc| {
                Ok(TrainingExample {
                    input: encode_input(doc.tokens.as_slice(), vocabulary),
                    target: encode_label(&doc.tag, labels)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(TrainingSet { examples })
    }

    /// Random permutation of the whole set.
    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) {
        self.examples.shuffle(rng);
    }

    /// Split off the trailing `validation_split` fraction.
    ///
    /// The training part keeps `ceil(n * (1 - validation_split))` examples,
    /// so the held-out slice rounds down: 11 to 19 examples at a 0.1 split
    /// hold out one, not two, and a corpus of fewer than ten examples holds
    /// out none. Rounding the other way would leave a two-pattern corpus
    /// with a single training example.
    pub fn split(mut self, validation_split: f64) -> (TrainingSet, TrainingSet) {
        let n = self.examples.len();
        let train_len = ((n as f64) * (1.0 - validation_split)).ceil() as usize;
        let train_len = train_len.min(n);
        let validation = self.examples.split_off(train_len);
        (self, TrainingSet::new(validation))
    }

    /// The examples, in current order.
    pub fn examples(&self) -> &[TrainingExample] {
        &self.examples
    }

    /// Number of examples.
    pub fn len(&self) -> usize {
        self.examples.len()
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    /// Stack all examples into `(inputs, targets)` matrices.
    pub fn to_matrices(&self) -> (Array2<f32>, Array2<f32>) {
        stack_examples(&self.examples)
    }

    /// Iterate over consecutive batches of at most `batch_size` examples.
    pub fn batches(&self, batch_size: usize) -> impl Iterator<Item = (Array2<f32>, Array2<f32>)> + '_ {
        self.examples.chunks(batch_size.max(1)).map(stack_examples)
    }
}

/// Stack examples row by row. All examples must share dimensions.
pub fn stack_examples(examples: &[TrainingExample]) -> (Array2<f32>, Array2<f32>) {
    let input_dim = examples.first().map_or(0, |e| e.input.len());
    let target_dim = examples.first().map_or(0, |e| e.target.len());

    let mut inputs = Array2::zeros((examples.len(), input_dim));
    let mut targets = Array2::zeros((examples.len(), target_dim));
    for (row, example) in examples.iter().enumerate() {
        inputs.row_mut(row).assign(&example.input);
        targets.row_mut(row).assign(&example.target);
    }
    (inputs, targets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn vocabulary() -> Vocabulary {
        Vocabulary::from_tokens(vec!["bye", "hello", "there"])
    }

    #[test]
    fn test_encode_input_presence_only() {
        let bag = encode_input(&["hello", "hello", "there", "unknown"], &vocabulary());
        assert_eq!(bag, array![0.0f32, 1.0, 1.0]);
    }

    #[test]
    fn test_encode_input_no_known_tokens() {
        let bag = encode_input(&["asdkjalksdj"], &vocabulary());
        assert_eq!(bag, array![0.0f32, 0.0, 0.0]);
    }

    #[test]
    fn test_encode_label() {
        let labels = LabelSet::from_tags(vec!["greeting", "goodbye"]);
        assert_eq!(encode_label("greeting", &labels).unwrap(), array![0.0f32, 1.0]);
        assert!(matches!(
            encode_label("thanks", &labels),
            Err(IntentlyError::UnknownLabel(_))
        ));
    }

    fn example(i: usize) -> TrainingExample {
        TrainingExample {
            input: array![i as f32, 0.0],
            target: array![1.0],
        }
    }

    #[test]
    fn test_split_sizes() {
        let set = TrainingSet::new((0..20).map(example).collect());
        let (train, validation) = set.split(0.1);
        assert_eq!(train.len(), 18);
        assert_eq!(validation.len(), 2);

        let set = TrainingSet::new((0..2).map(example).collect());
        let (train, validation) = set.split(0.1);
        assert_eq!(train.len(), 2);
        assert!(validation.is_empty());

        // held-out slice rounds down
        let set = TrainingSet::new((0..15).map(example).collect());
        let (train, validation) = set.split(0.1);
        assert_eq!(train.len(), 14);
        assert_eq!(validation.examples()[0].input[0], 14.0);
    }

    #[test]
    fn test_shuffle_is_a_permutation() {
        let mut set = TrainingSet::new((0..10).map(example).collect());
        set.shuffle(&mut StdRng::seed_from_u64(7));

        let mut seen: Vec<usize> = set.examples().iter().map(|e| e.input[0] as usize).collect();
        seen.sort();
        assert_eq!(seen, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_batches() {
        let set = TrainingSet::new((0..10).map(example).collect());
        let sizes: Vec<usize> = set.batches(4).map(|(x, _)| x.nrows()).collect();
        assert_eq!(sizes, vec![4, 4, 2]);

        let (x, y) = set.to_matrices();
        assert_eq!(x.dim(), (10, 2));
        assert_eq!(y.dim(), (10, 1));
        assert_eq!(x[[3, 0]], 3.0);
    }
}
