use thiserror::Error;

use codegen::{gen_assm, CodeGenError};
use lexer::{tokenize, LexError, Token};
use mir::{gen_tacky, tacky};
use parser::{parse, ParseError};

/// Any error the compiler core can report for a source file
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum CompileError {
    #[error("Lexer error: {0}")]
    Lex(#[from] LexError),
    #[error("Parser error: {0}")]
    Parse(#[from] ParseError),
    #[error("Codegen error: {0}")]
    CodeGen(#[from] CodeGenError),
}

/// Last stage of the core to run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Lex,
    Parse,
    Tacky,
    CodeGen,
}

/// Output of the last stage that ran
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artifact {
    Tokens(Vec<Token>),
    Ast(ast::Program),
    Tacky(tacky::TranslationUnit),
    Assembly(lir::Program),
}

/// Runs the pipeline over preprocessed source lines up to and including `stop`
pub fn compile<I, S>(lines: I, stop: Stage) -> Result<Artifact, CompileError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let tokens = tokenize(lines)?;

    if stop == Stage::Lex {
        return Ok(Artifact::Tokens(tokens));
    }

    let ast = parse(tokens)?;

    if stop == Stage::Parse {
        return Ok(Artifact::Ast(ast));
    }

    let tacky = gen_tacky(&ast);

    if stop == Stage::Tacky {
        return Ok(Artifact::Tacky(tacky));
    }

    Ok(Artifact::Assembly(gen_assm(&tacky)?))
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    use super::*;
    use lexer::TokenType;

    fn assembly(src: &str) -> String {
        let Artifact::Assembly(assm) = compile(src.lines(), Stage::CodeGen).unwrap() else {
            panic!("expected assembly");
        };
        emission::assembly_text(&assm).unwrap()
    }

    #[test]
    fn stops_after_lexing() {
        let artifact = compile(["return 5;"], Stage::Lex).unwrap();

        let Artifact::Tokens(tokens) = artifact else {
            panic!("expected tokens");
        };
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenType::Return,
                TokenType::Constant,
                TokenType::Semicolon,
                TokenType::Eof
            ]
        );
        assert_eq!(tokens[1].value.as_deref(), Some("5"));
    }

    #[test]
    fn stops_after_parsing() {
        let artifact = compile(["int main(void) { return 2; }"], Stage::Parse).unwrap();

        let Artifact::Ast(program) = artifact else {
            panic!("expected an AST");
        };
        assert_eq!(program.func.ident, "main");
        assert_eq!(
            program.func.body,
            ast::Stmt::Return {
                expr: ast::Expr::constant(2, 1),
                line: 1
            }
        );
    }

    #[test]
    fn stops_after_tacky() {
        let artifact = compile(["int main(void) { return -(~4); }"], Stage::Tacky).unwrap();

        let Artifact::Tacky(tacky) = artifact else {
            panic!("expected TACKY");
        };
        assert_eq!(
            tacky.func.instructions.last(),
            Some(&tacky::Instruction::Return(tacky::Val::Var(
                "tmp.1".to_string()
            )))
        );
    }

    #[test]
    fn return_zero_end_to_end() {
        let expected = indoc! {r#"
            	.globl main
            main:
            	pushq %rbp
            	movq %rsp, %rbp
            	movl $0, %eax
            	movq %rbp, %rsp
            	popq %rbp
            	ret
            .section .note.GNU-stack,"",@progbits
        "#};

        assert_eq!(assembly("int main(void) { return 0; }"), expected);
    }

    #[test]
    fn nested_unary_end_to_end() {
        let src = indoc! {"
            int main(void) {
                // bitwise then arithmetic
                return -(~ /* inline */ 4);
            }
        "};

        let expected = indoc! {r#"
            	.globl main
            main:
            	pushq %rbp
            	movq %rsp, %rbp
            	subq $8, %rsp
            	movl $4, -4(%rbp)
            	notl -4(%rbp)
            	movl -4(%rbp), %r10d
            	movl %r10d, -8(%rbp)
            	negl -8(%rbp)
            	movl -8(%rbp), %eax
            	movq %rbp, %rsp
            	popq %rbp
            	ret
            .section .note.GNU-stack,"",@progbits
        "#};

        assert_eq!(assembly(src), expected);
    }

    #[test]
    fn missing_constant_is_a_parse_error() {
        let err = compile(["int main(void) { return ; }"], Stage::CodeGen).unwrap_err();

        let CompileError::Parse(err) = err else {
            panic!("expected a parse error, got {:?}", err);
        };
        assert_eq!(err.token().map(|t| t.kind), Some(TokenType::Semicolon));
    }

    #[test]
    fn bad_character_is_a_lex_error() {
        let err = compile(["int main(void) {", "return $2;", "}"], Stage::Parse).unwrap_err();

        assert_eq!(
            err,
            CompileError::Lex(LexError::UnexpectedChar {
                ch: '$',
                line: 2,
                col: 8
            })
        );
        assert_eq!(
            err.to_string(),
            "Lexer error: unexpected character '$' at line 2, column 8"
        );
    }

    #[test]
    fn compiling_twice_gives_the_same_result() {
        let src = ["int main(void) { return ~(-(~(-1))); }"];

        assert_eq!(
            compile(src, Stage::CodeGen).unwrap(),
            compile(src, Stage::CodeGen).unwrap()
        );
    }
}
