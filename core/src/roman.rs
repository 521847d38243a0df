use crate::{GameError, Result};

const ONES: [&str; 4] = ["I", "X", "C", "M"];
const FIVES: [&str; 3] = ["V", "L", "D"];

/// Renders an integer as a Roman numeral, digit place by digit place.
///
/// Zero is written as `"O"` and negative values get a leading minus sign,
/// both deliberate departures from the classical system. Values with a
/// magnitude of 4000 or more cannot be expressed and are rejected.
pub fn romanise(num: i32) -> Result<String> {
    if num <= -4000 || num >= 4000 {
        return Err(GameError::NumeralOutOfRange(num));
    }
    if num == 0 {
        return Ok("O".to_owned());
    }
    if num < 0 {
        return Ok(format!("-{}", romanise(-num)?));
    }

    let mut roman = String::new();
    for place in (0usize..4).rev() {
        let digit = (num as usize / 10usize.pow(place as u32)) % 10;
        match digit {
            9 => {
                roman.push_str(ONES[place]);
                roman.push_str(ONES[place + 1]);
            }
            5..=8 => {
                roman.push_str(FIVES[place]);
                roman.push_str(&ONES[place].repeat(digit - 5));
            }
            4 => {
                roman.push_str(ONES[place]);
                roman.push_str(FIVES[place]);
            }
            _ => {
                roman.push_str(&ONES[place].repeat(digit));
            }
        }
    }
    Ok(roman)
}
