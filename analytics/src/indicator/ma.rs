// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation.
//! Simple moving averages over closes or volume.

use autotrader_markets::Bar;

pub fn sma(values: &[f64], n: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    if n == 0 {
        return out;
    }
    for i in 0..values.len() {
        if i + 1 < n {
            continue;
        }
        out[i] = values[i + 1 - n..=i].iter().sum::<f64>() / n as f64;
    }
    out
}

pub fn ma_close(bars: &[Bar], n: usize) -> Vec<f64> {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    sma(&closes, n)
}

pub fn ma_volume(bars: &[Bar], n: usize) -> Vec<f64> {
    let volumes: Vec<f64> = bars.iter().map(|b| b.volume).collect();
    sma(&volumes, n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sma_of_five_ones_is_one() {
        let values = vec![1.0; 10];
        let out = sma(&values, 5);
        assert_eq!(out[4], 1.0);
        assert!(out[3].is_nan());
    }
}
