use super::*;
use crate::types::TypeKind;

fn kinds(input: &str) -> Vec<TokenKind> {
    lex(input).unwrap().into_iter().map(|t| t.kind).collect()
}

#[test]
fn test_basic1() {
    let input = "int main() {}";
    let expected = vec![
        TokenKind::Type(TypeKind::Int),
        TokenKind::Identifier,
        TokenKind::OpenParanth,
        TokenKind::CloseParanth,
        TokenKind::OpenCurly,
        TokenKind::CloseCurly,
    ];
    assert_eq!(expected, kinds(input));
}

#[test]
fn test_numbers_and_arithmetic() {
    let tokens = lex("10 + 50 - 60;").unwrap();
    assert_eq!(tokens.len(), 6);
    assert_eq!(tokens[0], Token::constant(10, "10", 0));
    assert_eq!(tokens[1], Token::new(TokenKind::Plus, "+", 3));
    assert_eq!(tokens[2].value, 50);
    assert_eq!(tokens[3].kind, TokenKind::Hyphen);
    assert_eq!(tokens[4].value, 60);
    assert_eq!(tokens[5].kind, TokenKind::Semicolon);
}

#[test]
fn test_two_char_operators_win() {
    let expected = vec![
        TokenKind::IsEqual,
        TokenKind::IsNotEqual,
        TokenKind::IsLessThanOrEqual,
        TokenKind::IsGreaterThanOrEqual,
        TokenKind::IsLessThan,
        TokenKind::IsGreaterThan,
        TokenKind::Assign,
    ];
    assert_eq!(expected, kinds("== != <= >= < > ="));
    assert_eq!(
        vec![TokenKind::IsLessThan, TokenKind::Assign, TokenKind::Assign],
        kinds("< = =")
    );
}

#[test]
fn test_keywords_need_word_boundary() {
    let tokens = lex("if iffy return returned int integer sizeof sizeofx for_ while1 else").unwrap();
    let expected = vec![
        TokenKind::If,
        TokenKind::Identifier,
        TokenKind::Return,
        TokenKind::Identifier,
        TokenKind::Type(TypeKind::Int),
        TokenKind::Identifier,
        TokenKind::Sizeof,
        TokenKind::Identifier,
        TokenKind::Identifier,
        TokenKind::Identifier,
        TokenKind::Else,
    ];
    let got: Vec<_> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(expected, got);
    assert_eq!(tokens[1].text, "iffy");
    assert_eq!(tokens[8].text, "for_");
}

#[test]
fn test_punctuation() {
    let expected = vec![
        TokenKind::Asterisk,
        TokenKind::FSlash,
        TokenKind::Ampersand,
        TokenKind::OpenBracket,
        TokenKind::CloseBracket,
        TokenKind::Comma,
        TokenKind::OpenCurly,
        TokenKind::CloseCurly,
    ];
    assert_eq!(expected, kinds("*/&[],{}"));
}

#[test]
fn test_positions_follow_source() {
    let tokens = lex("int *p;\n  p = &x;").unwrap();
    let positions: Vec<_> = tokens.iter().map(|t| t.pos).collect();
    assert_eq!(positions, vec![0, 4, 5, 6, 10, 12, 14, 15, 16]);
}

#[test]
fn test_large_constant_wraps() {
    let tokens = lex("18446744073709551617").unwrap();
    assert_eq!(tokens[0].value, 1);
}

#[test]
fn test_bad_atsign() {
    let input = "int main() {\nreturn 0@1;\n}";
    let err = lex(input).unwrap_err();
    assert_eq!(err.ch, '@');
    assert_eq!(err.position, 21);
    assert_eq!(err.text, input);
    let message = err.to_string();
    assert!(message.contains("return 0@1;\n        ^"), "{message}");
}

#[test]
fn test_bad_constant() {
    let err = lex("return 1foo;").unwrap_err();
    assert_eq!(err.ch, 'f');
    assert_eq!(err.position, 8);
}

#[test]
fn test_lone_bang() {
    let err = lex("a ! b").unwrap_err();
    assert_eq!(err.ch, '!');
    assert_eq!(err.position, 2);
}

#[test]
fn test_empty_input() {
    assert_eq!(lex("  \n\t ").unwrap(), Tokens::new());
}
