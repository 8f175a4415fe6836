use super::*;
use crate::lexer;

fn parse_src(src: &str) -> Result<Program> {
    let tokens = lexer::lex(src).unwrap();
    parse(&tokens)
}

fn main_body(src: &str) -> Vec<Statement> {
    let mut program = parse_src(src).unwrap();
    assert_eq!(program.functions.len(), 1);
    program.functions.remove(0).body
}

fn single_exp(body: &str) -> Exp {
    let src = format!("int main() {{ {body} }}");
    match main_body(&src).pop() {
        Some(Statement::Exp(exp)) => exp,
        other => panic!("expected expression statement, got {other:?}"),
    }
}

fn var(i: usize) -> Exp {
    Exp::Var(LVarId(i))
}

#[test]
fn test_expression_precedense_1() {
    let parsed = single_exp("1 * 2 - 3 * (4 + 5);");
    let expected = Exp::binary(
        BinaryOp::Substract,
        Exp::binary(BinaryOp::Multiply, Exp::Constant(1), Exp::Constant(2)),
        Exp::binary(
            BinaryOp::Multiply,
            Exp::Constant(3),
            Exp::binary(BinaryOp::Add, Exp::Constant(4), Exp::Constant(5)),
        ),
    );
    assert_eq!(expected, parsed);
}

#[test]
fn test_left_assoc_and_equality_lowest() {
    let parsed = single_exp("1 - 2 - 3 == 4 < 5;");
    let expected = Exp::binary(
        BinaryOp::IsEqual,
        Exp::binary(
            BinaryOp::Substract,
            Exp::binary(BinaryOp::Substract, Exp::Constant(1), Exp::Constant(2)),
            Exp::Constant(3),
        ),
        Exp::binary(BinaryOp::LessThan, Exp::Constant(4), Exp::Constant(5)),
    );
    assert_eq!(expected, parsed);
}

#[test]
fn test_assignment_is_right_assoc() {
    let body = main_body("int main() { int a; int b; a = b = 3; }");
    let expected = Exp::assign(var(0), Exp::assign(var(1), Exp::Constant(3)));
    assert_eq!(body[2], Statement::Exp(expected));
}

#[test]
fn test_unary_minus_is_zero_minus() {
    let parsed = single_exp("-3 * +2;");
    let expected = Exp::binary(
        BinaryOp::Multiply,
        Exp::binary(BinaryOp::Substract, Exp::Constant(0), Exp::Constant(3)),
        Exp::Constant(2),
    );
    assert_eq!(expected, parsed);
}

#[test]
fn test_greater_swaps_operands() {
    assert_eq!(single_exp("1 > 2;"), single_exp("2 < 1;"));
    assert_eq!(single_exp("1 >= 2;"), single_exp("2 <= 1;"));
}

#[test]
fn test_index_is_deref_of_sum() {
    let body = main_body("int main() { int a[3]; int i; a[i]; *(a + i); }");
    assert_eq!(body[2], body[3]);
    assert_eq!(
        body[2],
        Statement::Exp(Exp::deref(Exp::binary(BinaryOp::Add, var(0), var(1))))
    );
}

#[test]
fn test_sizeof() {
    let body = main_body("int main() { int x; int *p; int a[4]; sizeof x; sizeof(p); sizeof a; sizeof 1; }");
    let sizes: Vec<_> = body[3..].to_vec();
    let expected: Vec<_> = [8, 8, 8, 8]
        .into_iter()
        .map(|n| Statement::Exp(Exp::Constant(n)))
        .collect();
    assert_eq!(expected, sizes);
}

#[test]
fn test_sizeof_any_pointer_depth() {
    let body = main_body("int main() { int **pp; int ***ppp; int *q[2]; sizeof pp; sizeof ppp; sizeof q; }");
    let expected: Vec<_> = [8, 8, 8]
        .into_iter()
        .map(|n| Statement::Exp(Exp::Constant(n)))
        .collect();
    assert_eq!(expected, body[3..].to_vec());
}

#[test]
fn test_sizeof_rejects_expressions() {
    let err = parse_src("int main() { int x; sizeof(x + 1); }").unwrap_err();
    assert_eq!(err.inner, InnerParseError::InvalidSizeofOperand);
    assert_eq!(err.pos, 26);
}

#[test]
fn test_for_with_empty_clauses() {
    let body = main_body("int main() { for (;;) 1; }");
    let expected = Statement::For {
        init: None,
        condition: None,
        post: None,
        body: Box::new(Statement::Exp(Exp::Constant(1))),
    };
    assert_eq!(vec![expected], body);
}

#[test]
fn test_if_else_while() {
    let body = main_body("int main() { int i; if (i) i = 1; else { i = 2; } while (i < 3) i = i + 1; }");
    assert!(matches!(body[1], Statement::If { els: Some(_), .. }));
    assert!(matches!(body[2], Statement::While { .. }));
}

#[test]
fn test_call_arguments_in_order() {
    let parsed = single_exp("foo(1, 2 + 3, bar());");
    let expected = Exp::call(
        "foo".into(),
        vec![
            Exp::Constant(1),
            Exp::binary(BinaryOp::Add, Exp::Constant(2), Exp::Constant(3)),
            Exp::call("bar".into(), Vec::new()),
        ],
    );
    assert_eq!(expected, parsed);
}

#[test]
fn test_function_with_params() {
    let program = parse_src("int add(int a, int *b) { return a; } int main() { return add(1, 2); }").unwrap();
    let add = &program.functions[0];
    assert_eq!(add.name, "add");
    assert_eq!(add.params, 2);
    assert_eq!(add.locals[1].pointers, 1);
    assert_eq!(add.locals[1].arg_index, Some(1));
    assert_eq!(add.body, vec![Statement::Return(var(0))]);
    assert_eq!(program.functions[1].name, "main");
}

#[test]
fn test_declaration_binds_slot() {
    let program = parse_src("int main() { int x; int *y; }").unwrap();
    let main = &program.functions[0];
    assert_eq!(
        main.body,
        vec![
            Statement::Declaration(LVarId(0)),
            Statement::Declaration(LVarId(1))
        ]
    );
    assert_eq!(main.frame_size(), 16);
    assert_eq!(main.lvar(LVarId(1)).unwrap().offset, 16);
}

#[test]
fn test_unknown_identifier() {
    let err = parse_src("int main() { return y; }").unwrap_err();
    assert_eq!(err.inner, InnerParseError::UnknownIdentifier("y".into()));
    assert_eq!(err.pos, 20);
}

#[test]
fn test_duplicate_identifier() {
    let err = parse_src("int main() { int x; int x; }").unwrap_err();
    assert_eq!(err.inner, InnerParseError::DuplicateIdentifier("x".into()));
}

#[test]
fn test_missing_semicolon() {
    let err = parse_src("int main() { return 1 }").unwrap_err();
    match err.inner {
        InnerParseError::ExpectedButGot(TokenKind::Semicolon, got) => assert_eq!(got.text, "}"),
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(err.pos, 22);
}

#[test]
fn test_unexpected_eof() {
    let err = parse_src("int main() { return 1;").unwrap_err();
    assert_eq!(err.inner, InnerParseError::UnexpectedEof);
    assert_eq!(err.pos, 22);
}

#[test]
fn test_bad_factor() {
    let err = parse_src("int main() { return ); }").unwrap_err();
    assert!(matches!(err.inner, InnerParseError::BadFactor(_)));
}

#[test]
fn test_expected_number_in_array() {
    let err = parse_src("int main() { int n; int a[n]; }").unwrap_err();
    assert!(matches!(err.inner, InnerParseError::ExpectedNumber(_)));
}

#[test]
fn test_empty_program() {
    assert_eq!(parse(&[]), Ok(Program { functions: vec![] }));
}
