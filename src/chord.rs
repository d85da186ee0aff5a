/*
Chord Frequencies
=================

A voice is tuned to a chord, not a single pitch. Each chord member gets its
own resonator, so the frequency set decides both the pitches that ring and
(by position) which side of the stereo field each one leans to.

The Math
--------

    root_hz   = BASE_HZ[root] * 2^(octave - 4)
    member_hz = root_hz * 2^(semitones / 12)

BASE_HZ is the fourth octave (A4 = 440 Hz), rounded to two decimals. Octaves
outside the usual 3..=5 range simply keep doubling or halving, up to
MAX_OCTAVE_SHIFT octaves away from 4 where f32 would overflow to infinity or
flush to zero.

  Quality      Semitones
  ----------   ------------
  Major        0  4  7
  Minor        0  3  7
  Diminished   0  3  6
  Augmented    0  4  8
  Maj7         0  4  7  11
  Min7         0  3  7  10
*/

/// One of the twelve pitch classes, sharps only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PitchClass {
    C,
    Cs,
    D,
    Ds,
    E,
    F,
    Fs,
    G,
    Gs,
    A,
    As,
    B,
}

impl PitchClass {
    pub const ALL: [PitchClass; 12] = [
        PitchClass::C,
        PitchClass::Cs,
        PitchClass::D,
        PitchClass::Ds,
        PitchClass::E,
        PitchClass::F,
        PitchClass::Fs,
        PitchClass::G,
        PitchClass::Gs,
        PitchClass::A,
        PitchClass::As,
        PitchClass::B,
    ];

    /// Frequency of this pitch class in the fourth octave.
    pub fn base_hz(self) -> f32 {
        match self {
            PitchClass::C => 261.63,
            PitchClass::Cs => 277.18,
            PitchClass::D => 293.66,
            PitchClass::Ds => 311.13,
            PitchClass::E => 329.63,
            PitchClass::F => 349.23,
            PitchClass::Fs => 369.99,
            PitchClass::G => 392.00,
            PitchClass::Gs => 415.30,
            PitchClass::A => 440.00,
            PitchClass::As => 466.16,
            PitchClass::B => 493.88,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PitchClass::C => "C",
            PitchClass::Cs => "C#",
            PitchClass::D => "D",
            PitchClass::Ds => "D#",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::Fs => "F#",
            PitchClass::G => "G",
            PitchClass::Gs => "G#",
            PitchClass::A => "A",
            PitchClass::As => "A#",
            PitchClass::B => "B",
        }
    }

    /// Parse a name like `"C#"`, `"Db"` or `"a"`. Flats map to their sharp.
    pub fn from_name(name: &str) -> Option<Self> {
        let pc = match name.trim().to_ascii_uppercase().as_str() {
            "C" | "B#" => PitchClass::C,
            "C#" | "DB" => PitchClass::Cs,
            "D" => PitchClass::D,
            "D#" | "EB" => PitchClass::Ds,
            "E" | "FB" => PitchClass::E,
            "F" | "E#" => PitchClass::F,
            "F#" | "GB" => PitchClass::Fs,
            "G" => PitchClass::G,
            "G#" | "AB" => PitchClass::Gs,
            "A" => PitchClass::A,
            "A#" | "BB" => PitchClass::As,
            "B" | "CB" => PitchClass::B,
            _ => return None,
        };
        Some(pc)
    }
}

/// Chord quality; decides how many resonators a voice gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChordQuality {
    Major,
    Minor,
    Diminished,
    Augmented,
    Maj7,
    Min7,
}

impl ChordQuality {
    pub const ALL: [ChordQuality; 6] = [
        ChordQuality::Major,
        ChordQuality::Minor,
        ChordQuality::Maj7,
        ChordQuality::Min7,
        ChordQuality::Diminished,
        ChordQuality::Augmented,
    ];

    /// Semitone offsets from the root, in voicing order.
    pub fn intervals(self) -> &'static [u8] {
        match self {
            ChordQuality::Major => &[0, 4, 7],
            ChordQuality::Minor => &[0, 3, 7],
            ChordQuality::Diminished => &[0, 3, 6],
            ChordQuality::Augmented => &[0, 4, 8],
            ChordQuality::Maj7 => &[0, 4, 7, 11],
            ChordQuality::Min7 => &[0, 3, 7, 10],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ChordQuality::Major => "Major",
            ChordQuality::Minor => "Minor",
            ChordQuality::Diminished => "Diminished",
            ChordQuality::Augmented => "Augmented",
            ChordQuality::Maj7 => "Maj7",
            ChordQuality::Min7 => "Min7",
        }
    }

    /// Case-insensitive lookup; accepts a few common spellings.
    pub fn from_name(name: &str) -> Option<Self> {
        let quality = match name.trim().to_ascii_lowercase().as_str() {
            "major" | "maj" => ChordQuality::Major,
            "minor" | "min" | "m" => ChordQuality::Minor,
            "diminished" | "dim" => ChordQuality::Diminished,
            "augmented" | "aug" => ChordQuality::Augmented,
            "maj7" | "major7" | "major seventh" => ChordQuality::Maj7,
            "min7" | "m7" | "minor7" | "minor seventh" => ChordQuality::Min7,
            _ => return None,
        };
        Some(quality)
    }
}

/// Furthest an octave may sit from the reference before it is pinned.
pub const MAX_OCTAVE_SHIFT: i32 = 116;

/// Frequency of `root` in the given octave (octave 4 is the reference).
///
/// Always finite and strictly positive.
#[inline]
pub fn root_frequency(root: PitchClass, octave: i32) -> f32 {
    let shift = octave
        .saturating_sub(4)
        .clamp(-MAX_OCTAVE_SHIFT, MAX_OCTAVE_SHIFT);
    root.base_hz() * 2.0_f32.powi(shift)
}

/// Absolute chord member frequencies, in interval order.
///
/// Total for every root, quality and octave.
pub fn chord_frequencies(root: PitchClass, quality: ChordQuality, octave: i32) -> Vec<f32> {
    let root_hz = root_frequency(root, octave);

    quality
        .intervals()
        .iter()
        .map(|&semitones| root_hz * 2.0_f32.powf(semitones as f32 / 12.0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f32, expected: f32, tolerance: f32) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn c_maj7_octave_four() {
        let freqs = chord_frequencies(PitchClass::C, ChordQuality::Maj7, 4);
        let expected = [261.63, 329.63, 392.00, 493.88];

        assert_eq!(freqs.len(), expected.len());
        for (&f, &e) in freqs.iter().zip(&expected) {
            assert_close(f, e, 0.1);
        }
    }

    #[test]
    fn a_minor_octave_five() {
        let freqs = chord_frequencies(PitchClass::A, ChordQuality::Minor, 5);
        let expected = [880.00, 1046.50, 1318.51];

        assert_eq!(freqs.len(), expected.len());
        for (&f, &e) in freqs.iter().zip(&expected) {
            assert_close(f, e, 0.1);
        }
    }

    #[test]
    fn members_follow_interval_ratios() {
        for root in PitchClass::ALL {
            for quality in ChordQuality::ALL {
                for octave in 3..=5 {
                    let freqs = chord_frequencies(root, quality, octave);
                    let offsets = quality.intervals();
                    assert_eq!(freqs.len(), offsets.len());

                    for pair in freqs.windows(2) {
                        assert!(pair[1] > pair[0], "{root:?} {quality:?} not increasing");
                    }

                    for (i, &f) in freqs.iter().enumerate() {
                        let semis = offsets[i] as f32 - offsets[0] as f32;
                        let expected = freqs[0] * 2.0_f32.powf(semis / 12.0);
                        assert_close(f, expected, expected * 1e-5);
                    }
                }
            }
        }
    }

    #[test]
    fn octave_up_doubles_every_member() {
        for root in PitchClass::ALL {
            for quality in ChordQuality::ALL {
                for octave in -2..8 {
                    let low = chord_frequencies(root, quality, octave);
                    let high = chord_frequencies(root, quality, octave + 1);
                    for (l, h) in low.iter().zip(&high) {
                        assert_close(*h, 2.0 * l, l * 1e-5);
                    }
                }
            }
        }
    }

    #[test]
    fn extreme_octaves_stay_positive_and_finite() {
        for octave in [i32::MIN, i32::MIN + 1, -200, -4, 0, 9, 12, 200, i32::MAX] {
            for root in PitchClass::ALL {
                for quality in ChordQuality::ALL {
                    for f in chord_frequencies(root, quality, octave) {
                        assert!(f.is_finite() && f > 0.0, "octave {octave} gave {f}");
                    }
                }
            }
        }
    }

    #[test]
    fn names_round_trip() {
        for root in PitchClass::ALL {
            assert_eq!(PitchClass::from_name(root.name()), Some(root));
        }
        for quality in ChordQuality::ALL {
            assert_eq!(ChordQuality::from_name(quality.name()), Some(quality));
        }
        assert_eq!(PitchClass::from_name("Eb"), Some(PitchClass::Ds));
        assert_eq!(PitchClass::from_name("H"), None);
    }
}
