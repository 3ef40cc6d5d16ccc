//! Korean particle selection for the self-introduction greeting.
//!
//! Hangul syllable blocks decompose as `code = codepoint - 0xAC00`, with the
//! trailing consonant (jongseong) index at `code % 28`. Index 0 means the
//! syllable ends in a vowel, which takes "야"; any other index takes "이야".

/// First Hangul syllable block (가).
const HANGUL_BASE: u32 = 0xAC00;
/// Number of composed Hangul syllables (가..힣).
const HANGUL_SYLLABLE_COUNT: u32 = 11172;
/// Number of jongseong slots per syllable block.
const JONGSEONG_COUNT: u32 = 28;

/// Greeting used when no usable name was given.
const FALLBACK: &str = "나야";

/// Append the informal self-introduction particle to a name:
/// "민찬" → "민찬이야", "몽이" → "몽이야", "Bob" → "Bob야".
pub fn with_subject_particle(name: &str) -> String {
    let trimmed = name.trim();
    let Some(last) = trimmed.chars().last() else {
        return FALLBACK.to_string();
    };

    let particle = match (last as u32).checked_sub(HANGUL_BASE) {
        Some(code) if code < HANGUL_SYLLABLE_COUNT && code % JONGSEONG_COUNT != 0 => "이야",
        _ => "야",
    };
    format!("{trimmed}{particle}")
}

/// The fixed first message, built server-side rather than trusted from the
/// model output.
pub fn greeting(name: &str) -> String {
    format!(
        "너의 성공을 도와줄 {}.\n\n너를 뭐라고 부를까?",
        with_subject_particle(name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_consonant_takes_iya() {
        assert_eq!(with_subject_particle("민찬"), "민찬이야");
        assert_eq!(with_subject_particle("몽글"), "몽글이야");
    }

    #[test]
    fn vowel_final_syllable_takes_ya() {
        assert_eq!(with_subject_particle("몽이"), "몽이야");
        assert_eq!(with_subject_particle("루나"), "루나야");
    }

    #[test]
    fn non_hangul_takes_ya() {
        assert_eq!(with_subject_particle("Bob"), "Bob야");
        assert_eq!(with_subject_particle("R2"), "R2야");
    }

    #[test]
    fn empty_name_falls_back() {
        assert_eq!(with_subject_particle(""), FALLBACK);
        assert_eq!(with_subject_particle("   "), FALLBACK);
    }

    #[test]
    fn name_is_trimmed() {
        assert_eq!(with_subject_particle(" 민찬 "), "민찬이야");
    }

    #[test]
    fn greeting_embeds_particle_form() {
        assert_eq!(
            greeting("민찬"),
            "너의 성공을 도와줄 민찬이야.\n\n너를 뭐라고 부를까?"
        );
    }
}
