use crate::core::{DataClass, Dataset};

/// Single-feature dataset; class `i` gets id `i` and the values in `classes[i]`.
pub fn dataset_1d(classes: &[&[f64]]) -> Dataset {
    let classes = classes
        .iter()
        .enumerate()
        .map(|(id, values)| {
            DataClass::with_points(id, 1, values.iter().map(|v| vec![*v]).collect())
                .expect("one value per point")
        })
        .collect();
    Dataset::new(1, classes).expect("single feature classes")
}

/// Two classes, feature 0 separates them well, feature 1 barely.
pub fn two_feature_dataset() -> Dataset {
    let a = DataClass::with_points(
        1,
        2,
        vec![
            vec![1.0, 10.0],
            vec![1.5, 12.0],
            vec![2.0, 11.0],
            vec![2.5, 13.0],
        ],
    )
    .expect("two features");
    let b = DataClass::with_points(
        2,
        2,
        vec![
            vec![8.0, 11.5],
            vec![8.5, 10.5],
            vec![9.0, 12.5],
            vec![9.5, 12.0],
        ],
    )
    .expect("two features");
    Dataset::new(2, vec![a, b]).expect("two features")
}

/// Text form of a small three-class dataset in the input file format.
pub fn dataset_text() -> &'static str {
    "12 2 3
1.0 5.0 1
1.2 5.5 1
0.8 4.5 1
1.1 5.2 1
5.0 5.1 2
5.3 4.9 2
4.7 5.3 2
5.1 4.8 2
9.0 5.0 3
9.4 5.6 3
8.8 4.4 3
9.1 5.1 3
"
}
