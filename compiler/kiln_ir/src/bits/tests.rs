use super::*;

// === Lifecycle ===

#[test]
fn new_is_uninit_and_empty() {
    let bits = Bits::new();
    assert_eq!(bits.state(), BitsState::Uninit);
    assert!(!bits.is_reset());
    assert!(!bits.is_member(0));
    assert_eq!(bits.next_bit(0), None);
}

#[test]
fn first_write_makes_normal() {
    let mut bits = Bits::new();
    bits.include(3);
    assert_eq!(bits.state(), BitsState::Normal);
}

#[test]
fn reset_then_assign() {
    let mut bits = Bits::new();
    bits.include(1);
    bits.reset();
    assert!(bits.is_reset());
    assert_eq!(bits.state(), BitsState::Unknown);

    let mut other = Bits::new();
    other.include(9);
    bits.assign(&other);
    assert_eq!(bits.state(), BitsState::Normal);
    assert!(bits.is_member(9));
    assert!(!bits.is_member(1));
}

#[test]
#[should_panic(expected = "Unknown")]
fn include_on_reset_panics() {
    let mut bits = Bits::new_reset();
    bits.include(0);
}

#[test]
#[should_panic(expected = "Unknown")]
fn is_member_on_reset_panics() {
    let bits = Bits::new_reset();
    let _ = bits.is_member(0);
}

#[test]
#[should_panic(expected = "Unknown")]
fn and_with_reset_operand_panics() {
    let mut bits = Bits::new();
    bits.and_set(&Bits::new_reset());
}

// === Membership ===

#[test]
fn include_spans_words() {
    let mut bits = Bits::new();
    bits.include(0).include(31).include(32).include(100);
    for x in [0, 31, 32, 100] {
        assert!(bits.is_member(x), "{x} should be a member");
    }
    assert!(!bits.is_member(1));
    assert!(!bits.is_member(33));
    assert!(!bits.is_member(10_000));
}

#[test]
fn include_range_is_half_open() {
    let mut bits = Bits::new();
    bits.include_range(3, 7);
    assert_eq!(bits.iter().collect::<Vec<_>>(), vec![3, 4, 5, 6]);
}

#[test]
fn exclude_removes_member() {
    let mut bits = Bits::new();
    bits.include(5).include(6);
    bits.exclude(5);
    assert!(!bits.is_member(5));
    assert!(bits.is_member(6));
}

#[test]
fn exclude_from_keeps_lower_members() {
    let mut bits = Bits::new();
    bits.include(1).include(30).include(40).include(70);
    bits.exclude_from(35);
    assert_eq!(bits.iter().collect::<Vec<_>>(), vec![1, 30]);
}

#[test]
fn exclude_from_past_end_changes_nothing() {
    let mut bits = Bits::new();
    bits.include(2).include(33);
    bits.exclude_from(1000);
    assert_eq!(bits.iter().collect::<Vec<_>>(), vec![2, 33]);
}

// === Set operations ===

fn set_of(xs: &[usize]) -> Bits {
    let mut bits = Bits::new();
    for &x in xs {
        bits.include(x);
    }
    bits
}

#[test]
fn and_or_diff_xor() {
    let a = set_of(&[1, 2, 40, 90]);
    let b = set_of(&[2, 40]);

    let mut and = a.dup();
    and.and_set(&b);
    assert_eq!(and.iter().collect::<Vec<_>>(), vec![2, 40]);

    let mut or = b.dup();
    or.or_set(&a);
    assert_eq!(or.iter().collect::<Vec<_>>(), vec![1, 2, 40, 90]);

    let mut diff = a.dup();
    diff.diff_set(&b);
    assert_eq!(diff.iter().collect::<Vec<_>>(), vec![1, 90]);

    let mut xor = set_of(&[1, 2]);
    xor.xor_set(&set_of(&[2, 3]));
    assert_eq!(xor.iter().collect::<Vec<_>>(), vec![1, 3]);
}

#[test]
fn and_with_shorter_set_drops_high_members() {
    let mut a = set_of(&[1, 100]);
    a.and_set(&set_of(&[1]));
    assert_eq!(a.iter().collect::<Vec<_>>(), vec![1]);
}

#[test]
fn dup_is_independent() {
    let original = set_of(&[4]);
    let mut copy = original.dup();
    copy.include(5);
    assert!(!original.is_member(5));
    assert!(copy.is_member(4));
}

#[test]
fn clear_empties_but_keeps_known() {
    let mut bits = set_of(&[1, 2, 3]);
    bits.clear();
    assert_eq!(bits.state(), BitsState::Normal);
    assert_eq!(bits.next_bit(0), None);
}

// === Iteration and display ===

#[test]
fn next_bit_scans_forward() {
    let bits = set_of(&[3, 64, 65]);
    assert_eq!(bits.next_bit(0), Some(3));
    assert_eq!(bits.next_bit(3), Some(3));
    assert_eq!(bits.next_bit(4), Some(64));
    assert_eq!(bits.next_bit(65), Some(65));
    assert_eq!(bits.next_bit(66), None);
}

#[test]
fn display_lists_members() {
    assert_eq!(set_of(&[1, 5, 37]).to_string(), "{1, 5, 37}");
    assert_eq!(Bits::new().to_string(), "{}");
    assert_eq!(Bits::new_reset().to_string(), "<reset>");
}
