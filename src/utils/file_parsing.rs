/// Header of a dataset file: `<points> <features> <classes>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetHeader {
    pub n_points: usize,
    pub n_features: usize,
    pub n_classes: usize,
}

#[inline]
pub fn split_line_into_tokens(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}

/// Reads the first three whitespace separated integers of `line`.
///
/// Trailing tokens are ignored, like a stream extraction would.
pub fn parse_header_line(line: &str) -> Option<DatasetHeader> {
    let mut it = line.split_whitespace().map(|t| t.parse::<usize>());
    let n_points = it.next()?.ok()?;
    let n_features = it.next()?.ok()?;
    let n_classes = it.next()?.ok()?;
    Some(DatasetHeader {
        n_points,
        n_features,
        n_classes,
    })
}

/// Parses a finite feature value.
#[inline]
pub fn parse_feature_value(token: &str) -> Option<f64> {
    token.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses a class label. Accepts integral floats such as `2.0`.
pub fn parse_class_label(token: &str) -> Option<usize> {
    if let Ok(id) = token.parse::<usize>() {
        return Some(id);
    }
    let v = token.parse::<f64>().ok()?;
    if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v <= usize::MAX as f64 {
        Some(v as usize)
    } else {
        None
    }
}
